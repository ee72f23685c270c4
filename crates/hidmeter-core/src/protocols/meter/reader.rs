use std::ops::Range;

use super::error::{FramingError, Layer};

/// Bounds-checked little-endian reads over one protocol layer.
pub struct MeterReader<'a> {
    bytes: &'a [u8],
    layer: Layer,
}

impl<'a> MeterReader<'a> {
    pub fn new(bytes: &'a [u8], layer: Layer) -> Self {
        Self { bytes, layer }
    }

    fn too_short(&self, needed: usize) -> FramingError {
        FramingError::SizeMismatch {
            layer: self.layer,
            needed,
            actual: self.bytes.len(),
        }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), FramingError> {
        if self.bytes.len() < needed {
            return Err(self.too_short(needed));
        }
        Ok(())
    }

    pub fn require_exact_len(&self, needed: usize) -> Result<(), FramingError> {
        if self.bytes.len() != needed {
            return Err(self.too_short(needed));
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, FramingError> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or_else(|| self.too_short(offset + 1))
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], FramingError> {
        self.bytes
            .get(range.clone())
            .ok_or_else(|| self.too_short(range.end))
    }

    pub fn read_array<const N: usize>(&self, range: Range<usize>) -> Result<[u8; N], FramingError> {
        let bytes = self.read_slice(range)?;
        bytes.try_into().map_err(|_| FramingError::SizeMismatch {
            layer: self.layer,
            needed: N,
            actual: bytes.len(),
        })
    }

    pub fn read_u16_le(&self, range: Range<usize>) -> Result<u16, FramingError> {
        self.read_array(range).map(u16::from_le_bytes)
    }

    pub fn read_u32_le(&self, range: Range<usize>) -> Result<u32, FramingError> {
        self.read_array(range).map(u32::from_le_bytes)
    }

    pub fn read_f32_le(&self, range: Range<usize>) -> Result<f32, FramingError> {
        self.read_array(range).map(f32::from_le_bytes)
    }
}
