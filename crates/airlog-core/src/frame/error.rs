use thiserror::Error;

/// Errors returned by frame payload decoding.
///
/// # Examples
/// ```
/// use airlog_core::frame::FrameError;
///
/// let err = FrameError::TooShort { needed: 10, actual: 3 };
/// assert!(err.to_string().contains("payload too short"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("payload too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
}
