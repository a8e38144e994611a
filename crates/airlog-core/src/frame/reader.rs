use std::ops::Range;

use super::error::FrameError;

/// Bounds-checked view over a frame payload.
pub struct FrameReader<'a> {
    payload: &'a [u8],
}

impl<'a> FrameReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), FrameError> {
        if self.payload.len() < needed {
            return Err(FrameError::TooShort {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], FrameError> {
        self.payload
            .get(range.clone())
            .ok_or(FrameError::TooShort {
                needed: range.end,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_le(&self, range: Range<usize>) -> Result<u16, FrameError> {
        self.read_array(range).map(u16::from_le_bytes)
    }

    pub fn read_u32_le(&self, range: Range<usize>) -> Result<u32, FrameError> {
        self.read_array(range).map(u32::from_le_bytes)
    }

    fn read_array<const N: usize>(&self, range: Range<usize>) -> Result<[u8; N], FrameError> {
        let bytes = self.read_slice(range)?;
        bytes.try_into().map_err(|_| FrameError::TooShort {
            needed: N,
            actual: bytes.len(),
        })
    }
}
