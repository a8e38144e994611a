//! Stream decoding of measurement logs.
//!
//! `FrameDecoder` walks a raw buffer and yields every recognizable
//! measurement frame. Any byte that is not a frame header is treated as
//! noise and skipped on its own, so a single corrupted byte never costs more
//! than itself. A header whose payload runs past the end of the buffer ends
//! the scan.
//!
//! `decode` layers gap detection on top: whenever two consecutive
//! measurements are more than `GAP_THRESHOLD_SECS` apart, a `Sample::Gap` is
//! placed between them.
//!
//! Decoding is pure and total: every buffer, including an empty or fully
//! garbled one, decodes to a (possibly empty) sample sequence.

mod gap;

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::frame::{Measurement, is_frame_header, layout, parse_measurement};

pub use gap::{GAP_THRESHOLD_SECS, GapDetector, GapSpan, gap_spans};

/// One entry of a decoded log: a reading, or a break in the time series.
///
/// # Examples
/// ```
/// use airlog_core::{Measurement, Sample};
///
/// let sample = Sample::Measurement(Measurement { timestamp: 1, pm1: 2, pm2_5: 3, pm10: 4 });
/// assert_eq!(sample.measurement().map(|m| m.pm10), Some(4));
/// assert!(Sample::Gap.measurement().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Sample {
    Measurement(Measurement),
    Gap,
}

impl Sample {
    pub fn measurement(&self) -> Option<&Measurement> {
        match self {
            Sample::Measurement(m) => Some(m),
            Sample::Gap => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Sample::Gap)
    }
}

/// Iterator over the measurement frames of a raw log buffer.
///
/// The cursor only moves forward. A decoded frame consumes its length byte
/// and the full declared payload, including reserved bytes.
#[derive(Debug, Clone)]
pub struct FrameDecoder<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> FrameDecoder<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Byte offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl Iterator for FrameDecoder<'_> {
    type Item = Measurement;

    fn next(&mut self) -> Option<Measurement> {
        while let Some(&header) = self.buffer.get(self.cursor) {
            if !is_frame_header(header) {
                self.cursor += 1;
                continue;
            }

            let payload = self.buffer.get(self.cursor + 1..).unwrap_or_default();
            match parse_measurement(payload) {
                Ok(measurement) => {
                    self.cursor += layout::FRAME_LEN;
                    return Some(measurement);
                }
                Err(_) => {
                    // Truncated tail: nothing after it can be a frame.
                    self.cursor = self.buffer.len();
                    return None;
                }
            }
        }
        None
    }
}

impl FusedIterator for FrameDecoder<'_> {}

/// Decode a raw log buffer into samples, inserting gap markers.
///
/// # Examples
/// ```
/// use airlog_core::{Measurement, Sample, decode};
///
/// let bytes = [12, 0, 0, 0, 0, 1, 0, 2, 0, 3, 0, 0, 0];
/// assert_eq!(
///     decode(&bytes),
///     vec![Sample::Measurement(Measurement { timestamp: 0, pm1: 1, pm2_5: 2, pm10: 3 })]
/// );
/// assert!(decode(&[]).is_empty());
/// ```
pub fn decode(buffer: &[u8]) -> Vec<Sample> {
    let mut samples = Vec::new();
    let mut gaps = GapDetector::new();

    for measurement in FrameDecoder::new(buffer) {
        if gaps.observe(measurement.timestamp) {
            samples.push(Sample::Gap);
        }
        samples.push(Sample::Measurement(measurement));
    }
    samples
}
