use std::ops::Range;

/// Fixed-size little-endian writer; every range comes from `layout`.
pub struct MeterWriter<const N: usize> {
    buf: [u8; N],
}

impl<const N: usize> MeterWriter<N> {
    pub fn new() -> Self {
        Self { buf: [0u8; N] }
    }

    pub fn put_u8(&mut self, offset: usize, value: u8) {
        self.buf[offset] = value;
    }

    pub fn put_slice(&mut self, range: Range<usize>, value: &[u8]) {
        self.buf[range].copy_from_slice(value);
    }

    pub fn put_u16_le(&mut self, range: Range<usize>, value: u16) {
        self.put_slice(range, &value.to_le_bytes());
    }

    pub fn put_u32_le(&mut self, range: Range<usize>, value: u32) {
        self.put_slice(range, &value.to_le_bytes());
    }

    pub fn put_f32_le(&mut self, range: Range<usize>, value: f32) {
        self.put_slice(range, &value.to_le_bytes());
    }

    pub fn finish(self) -> [u8; N] {
        self.buf
    }
}

impl<const N: usize> Default for MeterWriter<N> {
    fn default() -> Self {
        Self::new()
    }
}
