//! airlog core library for offline decoding of particulate sensor logs.
//!
//! The sensor logger appends one length-prefixed binary frame per reading to
//! a per-day segment file. This crate turns such a segment into an ordered
//! sequence of samples and a deterministic JSON report: segment sources feed
//! the stream decoder, whose samples are summarized and reshaped into
//! chart-ready series. Decoding is byte-oriented and side-effect free; all
//! I/O is isolated in `source`.
//!
//! Invariants:
//! - Only frames with a length byte of 12 yield measurements.
//! - Unrecognized bytes are skipped one at a time; a truncated trailing frame
//!   ends decoding without error.
//! - A gap marker sits only between two measurements more than 900 s apart.
//! - Report outputs are deterministic and stable across runs.
//!
//! Version française (résumé):
//! Cette crate décode les journaux binaires du capteur de particules :
//! sources -> décodeur de trames (resynchronisation octet par octet,
//! marqueurs de coupure au-delà de 900 s) -> rapport JSON déterministe.
//! Les E/S restent dans `source`.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use airlog_core::analyze_log_file;
//!
//! let report = analyze_log_file(Path::new("log/pm/2024-05-01"))?;
//! println!("measurements: {}", report.summary.measurements);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
pub mod decoder;
pub mod frame;
mod quality;
mod series;
mod source;

pub use analysis::{AnalysisError, analyze_buffer, analyze_log_file, analyze_segment};
pub use decoder::{FrameDecoder, GAP_THRESHOLD_SECS, GapSpan, Sample, decode, gap_spans};
pub use frame::{Measurement, encode_frame, encode_frames};
pub use quality::{AirQuality, Limits, classify, limits};
pub use series::{Channel, DayWindow, UNIT, build_series};
pub use source::{
    DirSegmentSource, SegmentSource, SourceError, load_segment_or_empty, parse_segment_date,
    parse_utc_offset, read_log_file, segment_file_name,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the log holds no measurement.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoded log report with deterministic ordering.
///
/// # Examples
/// ```
/// use airlog_core::make_stub_report;
///
/// let report = make_stub_report("2024-05-01", 0);
/// assert_eq!(report.report_version, airlog_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp of the last measurement, or the epoch when empty.
    pub generated_at: String,

    /// Input segment metadata.
    pub input: InputInfo,

    /// Calendar day of the segment, when it was selected by date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<SegmentInfo>,
    /// Counts, time bounds and peaks.
    pub summary: LogSummary,
    /// Decoded samples in log order, gap markers included.
    pub samples: Vec<Sample>,
    /// One series per channel, in `Channel::ALL` order.
    pub series: Vec<SeriesSummary>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use airlog_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "airlog".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "airlog");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "airlog").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input segment metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Day selected for a segment and its chart window.
///
/// # Examples
/// ```
/// use airlog_core::SegmentInfo;
///
/// let segment = SegmentInfo {
///     date: "2024-05-01".to_string(),
///     window_start: Some("2024-05-01T00:00:00Z".to_string()),
///     window_end: Some("2024-05-02T00:00:00Z".to_string()),
/// };
/// assert_eq!(segment.date, "2024-05-01");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentInfo {
    /// Segment key in `YYYY-MM-DD` form.
    pub date: String,
    /// RFC3339 start of the day (inclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_start: Option<String>,
    /// RFC3339 end of the day (exclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_end: Option<String>,
}

/// Aggregate view of a decoded log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogSummary {
    /// Number of decoded measurements.
    pub measurements: u64,
    /// Number of gap markers inserted.
    pub gaps: u64,
    /// RFC3339 timestamp of the earliest measurement (if any).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the latest measurement (if any).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
    /// Highest reading per channel; empty when there are no measurements.
    pub peaks: Vec<ChannelPeak>,
}

/// Highest value seen on one channel.
///
/// # Examples
/// ```
/// use airlog_core::{AirQuality, Channel, ChannelPeak};
///
/// let peak = ChannelPeak {
///     channel: Channel::Pm25,
///     value: 30,
///     timestamp: 1_714_521_600,
///     level: AirQuality::Moderate,
/// };
/// assert_eq!(peak.level, AirQuality::Moderate);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPeak {
    pub channel: Channel,
    /// Concentration in µg/m³.
    pub value: u16,
    /// Unix seconds of the earliest reading with this value.
    pub timestamp: u32,
    pub level: AirQuality,
}

/// Time series of one channel, ready for charting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub channel: Channel,
    /// Display label (e.g., "PM 2.5").
    pub label: String,
    /// Unit of every value.
    pub unit: String,
    /// One point per sample; gap markers have neither timestamp nor value.
    pub points: Vec<SeriesPoint>,
}

/// A single chart point. Both fields are `null` for a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: Option<u32>,
    pub value: Option<u16>,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use airlog_core::make_stub_report;
///
/// let report = make_stub_report("2024-05-01", 26);
/// assert_eq!(report.input.bytes, 26);
/// assert!(report.samples.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "airlog".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        segment: None,
        summary: LogSummary::default(),
        samples: vec![],
        series: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_optional_fields_when_none() {
        let report = make_stub_report("segment", 0);

        let value = serde_json::to_value(&report).expect("report json");
        assert!(value.get("segment").is_none());
        let summary = value.get("summary").expect("summary");
        assert!(summary.get("time_start").is_none());
        assert!(summary.get("time_end").is_none());
        assert_eq!(summary["peaks"], serde_json::json!([]));
    }

    #[test]
    fn report_round_trips_through_json() {
        let mut report = make_stub_report("segment", 13);
        report.samples = vec![
            Sample::Measurement(Measurement {
                timestamp: 1,
                pm1: 2,
                pm2_5: 3,
                pm10: 4,
            }),
            Sample::Gap,
        ];
        let json = serde_json::to_string(&report).expect("serialize");
        let parsed: Report = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.samples, report.samples);
        assert!(parsed.segment.is_none());
    }
}
