use serde::{Deserialize, Serialize};

use super::error::FrameError;
use super::layout;
use super::reader::FrameReader;

/// One particulate matter reading.
///
/// Concentrations are in µg/m³; `timestamp` is in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measurement {
    pub timestamp: u32,
    pub pm1: u16,
    pub pm2_5: u16,
    pub pm10: u16,
}

/// Whether `byte` is the length prefix of a measurement frame.
pub fn is_frame_header(byte: u8) -> bool {
    byte == layout::FRAME_PAYLOAD_LEN
}

/// Decode a measurement from the bytes following a frame header.
///
/// Only the interpretable prefix is required; reserved bytes may be absent
/// and are never read.
///
/// # Errors
/// Returns `FrameError::TooShort` when fewer than 10 bytes are available.
///
/// # Examples
/// ```
/// use airlog_core::frame::parse_measurement;
///
/// let payload = [0, 0, 0, 0, 1, 0, 2, 0, 3, 0, 0, 0];
/// let m = parse_measurement(&payload)?;
/// assert_eq!((m.timestamp, m.pm1, m.pm2_5, m.pm10), (0, 1, 2, 3));
/// # Ok::<(), airlog_core::frame::FrameError>(())
/// ```
pub fn parse_measurement(payload: &[u8]) -> Result<Measurement, FrameError> {
    let reader = FrameReader::new(payload);
    reader.require_len(layout::INTERPRETED_LEN)?;

    Ok(Measurement {
        timestamp: reader.read_u32_le(layout::TIMESTAMP_RANGE)?,
        pm1: reader.read_u16_le(layout::PM1_RANGE)?,
        pm2_5: reader.read_u16_le(layout::PM2_5_RANGE)?,
        pm10: reader.read_u16_le(layout::PM10_RANGE)?,
    })
}
