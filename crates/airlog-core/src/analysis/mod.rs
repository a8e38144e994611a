use std::path::Path;

use thiserror::Error;
use time::{Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

use crate::decoder::{Sample, decode};
use crate::series::{DayWindow, build_series};
use crate::source::{
    SegmentSource, SourceError, load_segment_or_empty, read_log_file, segment_file_name,
};
use crate::{DEFAULT_GENERATED_AT, Report, SegmentInfo, make_stub_report};

mod summary;

use summary::build_summary;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Decode a single segment file into a report.
///
/// # Errors
/// Returns `AnalysisError::Source` when the file cannot be read. Malformed
/// content is never an error.
pub fn analyze_log_file(path: &Path) -> Result<Report, AnalysisError> {
    let buffer = read_log_file(path)?;
    Ok(analyze_buffer(&path.display().to_string(), &buffer))
}

/// Decode an in-memory segment into a report.
///
/// # Examples
/// ```
/// use airlog_core::{Measurement, analyze_buffer, encode_frames};
///
/// let bytes = encode_frames(&[
///     Measurement { timestamp: 0, pm1: 1, pm2_5: 2, pm10: 3 },
///     Measurement { timestamp: 3600, pm1: 1, pm2_5: 2, pm10: 3 },
/// ]);
/// let report = analyze_buffer("memory", &bytes);
/// assert_eq!(report.summary.measurements, 2);
/// assert_eq!(report.summary.gaps, 1);
/// ```
pub fn analyze_buffer(input_path: &str, buffer: &[u8]) -> Report {
    let samples = decode(buffer);

    let mut report = make_stub_report(input_path, buffer.len() as u64);
    report.summary = build_summary(&samples);
    report.generated_at = samples
        .iter()
        .rev()
        .find_map(Sample::measurement)
        .and_then(|m| ts_to_rfc3339(m.timestamp))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.series = build_series(&samples);
    report.samples = samples;

    tracing::debug!(
        input = input_path,
        bytes = buffer.len(),
        measurements = report.summary.measurements,
        gaps = report.summary.gaps,
        "decoded log segment"
    );
    report
}

/// Decode the segment of `date` from `source`.
///
/// `offset` is the logger's UTC offset; the day window runs from local
/// midnight to the next. A segment that cannot be read is treated as empty,
/// so this never fails; the report then simply holds no samples.
pub fn analyze_segment<S: SegmentSource + ?Sized>(
    source: &S,
    input_path: &str,
    date: Date,
    offset: UtcOffset,
) -> Report {
    let buffer = load_segment_or_empty(source, date);
    let mut report = analyze_buffer(input_path, &buffer);

    let window = DayWindow::for_date(date, offset);
    report.segment = Some(SegmentInfo {
        date: segment_file_name(date),
        window_start: format_rfc3339(window.start),
        window_end: format_rfc3339(window.end),
    });

    let outside = report
        .samples
        .iter()
        .filter_map(|sample| sample.measurement())
        .filter(|m| !window.contains(m.timestamp))
        .count();
    if outside > 0 {
        tracing::warn!(
            date = %segment_file_name(date),
            ?offset,
            outside,
            "measurements outside the segment day, check the UTC offset"
        );
    }
    report
}

pub(crate) fn ts_to_rfc3339(ts: u32) -> Option<String> {
    OffsetDateTime::from_unix_timestamp(i64::from(ts))
        .ok()
        .and_then(format_rfc3339)
}

fn format_rfc3339(dt: OffsetDateTime) -> Option<String> {
    dt.format(&Rfc3339).ok()
}
