use super::layout;
use super::parser::Measurement;

/// Encode a measurement as a complete frame, reserved bytes zeroed.
///
/// # Examples
/// ```
/// use airlog_core::frame::{Measurement, encode_frame};
///
/// let frame = encode_frame(&Measurement { timestamp: 0, pm1: 1, pm2_5: 2, pm10: 3 });
/// assert_eq!(frame, [12, 0, 0, 0, 0, 1, 0, 2, 0, 3, 0, 0, 0]);
/// ```
pub fn encode_frame(measurement: &Measurement) -> [u8; layout::FRAME_LEN] {
    let mut frame = [0u8; layout::FRAME_LEN];
    frame[0] = layout::FRAME_PAYLOAD_LEN;

    let payload = &mut frame[1..];
    payload[layout::TIMESTAMP_RANGE].copy_from_slice(&measurement.timestamp.to_le_bytes());
    payload[layout::PM1_RANGE].copy_from_slice(&measurement.pm1.to_le_bytes());
    payload[layout::PM2_5_RANGE].copy_from_slice(&measurement.pm2_5.to_le_bytes());
    payload[layout::PM10_RANGE].copy_from_slice(&measurement.pm10.to_le_bytes());
    frame
}

/// Encode measurements back to back, as the logger appends them.
pub fn encode_frames<'a, I>(measurements: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a Measurement>,
{
    measurements.into_iter().flat_map(encode_frame).collect()
}
