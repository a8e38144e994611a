//! Measurement frame codec.
//!
//! A log segment is a run of length-prefixed frames. Only a length byte of
//! 12 introduces a measurement frame; its payload carries a little-endian
//! Unix timestamp, three particulate concentrations and two reserved bytes.
//!
//! The module follows a layered structure:
//! - `layout`: byte offsets and ranges (source of truth)
//! - `reader`: bounds-checked byte access
//! - `parser`: decoding of the interpretable payload fields
//! - `writer`: frame encoding, matching what the logger appends
//! - `error`: explicit, actionable errors
//!
//! Reserved bytes are never interpreted.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod writer;

pub use error::FrameError;
pub use parser::{Measurement, is_frame_header, parse_measurement};
pub use writer::{encode_frame, encode_frames};
