use std::ops::Range;

/// Length-prefix value announcing a measurement frame.
pub const FRAME_PAYLOAD_LEN: u8 = 12;
/// Length prefix plus the full declared payload.
pub const FRAME_LEN: usize = 1 + FRAME_PAYLOAD_LEN as usize;
/// Payload bytes holding decoded fields.
pub const INTERPRETED_LEN: usize = 10;

pub const TIMESTAMP_RANGE: Range<usize> = 0..4;
pub const PM1_RANGE: Range<usize> = 4..6;
pub const PM2_5_RANGE: Range<usize> = 6..8;
pub const PM10_RANGE: Range<usize> = 8..10;
pub const RESERVED_RANGE: Range<usize> = 10..12;
