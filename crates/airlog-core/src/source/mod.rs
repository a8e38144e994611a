//! Log segment sources.
//!
//! The logger appends one file per calendar day, named `YYYY-MM-DD` under a
//! per-sensor directory. Sources hand raw segment bytes to the decoder and
//! keep all file I/O out of the decoding path.

mod dir;

pub use dir::{DirSegmentSource, read_log_file};

use thiserror::Error;
use time::{Date, UtcOffset};
use time::macros::format_description;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("log segment not found: {path}")]
    NotFound { path: String },
}

/// Supplier of raw log segments keyed by calendar date.
pub trait SegmentSource {
    fn read_segment(&self, date: Date) -> Result<Vec<u8>, SourceError>;
}

/// Read a segment, substituting an empty buffer when it cannot be read.
///
/// An empty buffer decodes to no samples, so a missing day renders as an
/// empty chart rather than an error.
pub fn load_segment_or_empty<S: SegmentSource + ?Sized>(source: &S, date: Date) -> Vec<u8> {
    match source.read_segment(date) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(
                date = %segment_file_name(date),
                error = %err,
                "log segment unavailable, using empty buffer"
            );
            Vec::new()
        }
    }
}

/// File name of the segment holding `date`, e.g. `2024-05-01`.
///
/// # Examples
/// ```
/// use airlog_core::segment_file_name;
/// use time::macros::date;
///
/// assert_eq!(segment_file_name(date!(2024 - 05 - 01)), "2024-05-01");
/// ```
pub fn segment_file_name(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

/// Parse a `YYYY-MM-DD` segment key.
///
/// # Errors
/// Returns the `time` parse error for malformed or impossible dates.
pub fn parse_segment_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
}

/// Parse a UTC offset such as `+02:00` or `-05:30`.
///
/// # Errors
/// Returns the `time` parse error when the sign or minutes are missing.
pub fn parse_utc_offset(value: &str) -> Result<UtcOffset, time::error::Parse> {
    UtcOffset::parse(
        value,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    struct FailingSource;

    impl SegmentSource for FailingSource {
        fn read_segment(&self, date: Date) -> Result<Vec<u8>, SourceError> {
            Err(SourceError::NotFound {
                path: segment_file_name(date),
            })
        }
    }

    struct FixedSource(Vec<u8>);

    impl SegmentSource for FixedSource {
        fn read_segment(&self, _date: Date) -> Result<Vec<u8>, SourceError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn failure_substitutes_empty_buffer() {
        assert!(load_segment_or_empty(&FailingSource, date!(2024 - 01 - 02)).is_empty());
    }

    #[test]
    fn success_passes_bytes_through() {
        let source = FixedSource(vec![12, 1, 2]);
        assert_eq!(
            load_segment_or_empty(&source, date!(2024 - 01 - 02)),
            vec![12, 1, 2]
        );
    }

    #[test]
    fn file_name_is_zero_padded() {
        let date = Date::from_calendar_date(987, time::Month::March, 4).unwrap();
        assert_eq!(segment_file_name(date), "0987-03-04");
    }

    #[test]
    fn parse_segment_date_round_trips_file_name() {
        let parsed = parse_segment_date("2023-12-31").unwrap();
        assert_eq!(parsed, date!(2023 - 12 - 31));
        assert_eq!(segment_file_name(parsed), "2023-12-31");
    }

    #[test]
    fn parse_utc_offset_accepts_signed_offsets() {
        assert_eq!(parse_utc_offset("+02:00").unwrap().whole_hours(), 2);
        let west = parse_utc_offset("-05:30").unwrap();
        assert_eq!(west.whole_seconds(), -(5 * 3600 + 30 * 60));
        assert_eq!(parse_utc_offset("+00:00").unwrap(), UtcOffset::UTC);
        assert!(parse_utc_offset("2").is_err());
        assert!(parse_utc_offset("+2").is_err());
    }

    #[test]
    fn parse_segment_date_rejects_bad_input() {
        assert!(parse_segment_date("2023-02-30").is_err());
        assert!(parse_segment_date("yesterday").is_err());
    }
}
