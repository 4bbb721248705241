use std::ops::Range;

/// Sum-of-bytes checksum stored as a little-endian u32.
///
/// The covered span is fixed relative to the record: it starts `lookback`
/// bytes before the checksum field itself and runs for `count` bytes, so it
/// stays put no matter where the field sits near the record's tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumSpec {
    pub lookback: usize,
    pub count: usize,
}

impl ChecksumSpec {
    pub const fn new(lookback: usize, count: usize) -> Self {
        Self { lookback, count }
    }

    pub fn covered(&self, field_offset: usize) -> Range<usize> {
        let start = field_offset.saturating_sub(self.lookback);
        start..start + self.count
    }

    pub fn compute(&self, record: &[u8], field_offset: usize) -> u32 {
        record[self.covered(field_offset)]
            .iter()
            .fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)))
    }
}
