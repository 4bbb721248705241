use crate::error::{CodecError, Result};

/// Cursor over an in-memory little-endian buffer. Offsets in errors are
/// relative to the start of the buffer handed to [`LittleEndianReader::new`].
pub struct LittleEndianReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> LittleEndianReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::Truncated {
                field: String::new(),
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Read `n` bytes and decode them as UTF-8, trimming trailing NUL padding.
    pub fn read_padded_string(&mut self, n: usize) -> Result<String> {
        let start = self.pos;
        let bytes = self.read_bytes(n)?;
        let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        String::from_utf8(bytes[..end].to_vec()).map_err(|_| CodecError::InvalidString {
            field: String::new(),
            offset: start,
        })
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_values_in_sequence() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&200u32.to_le_bytes());
        bytes.extend_from_slice(&(-5i16).to_le_bytes());
        bytes.extend_from_slice(&90.0f32.to_le_bytes());

        let mut r = LittleEndianReader::new(&bytes);
        assert_eq!(r.read_u32().expect("u32"), 200);
        assert_eq!(r.read_i16().expect("i16"), -5);
        assert_eq!(r.read_f32().expect("f32"), 90.0);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn short_buffer_reports_offset() {
        let bytes = [1u8, 2, 3];
        let mut r = LittleEndianReader::at(&bytes, 1);
        let err = r.read_u32().expect_err("too short");
        assert_eq!(
            err,
            CodecError::Truncated {
                field: String::new(),
                offset: 1,
                needed: 4,
                available: 2,
            }
        );
    }

    #[test]
    fn padded_string_trims_trailing_nuls() {
        let mut bytes = b"Nier".to_vec();
        bytes.resize(32, 0);
        let mut r = LittleEndianReader::new(&bytes);
        assert_eq!(r.read_padded_string(32).expect("string"), "Nier");
    }
}
