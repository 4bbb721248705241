//! Bit addressing used by every packed block in a save.
//!
//! Bits are numbered least-significant first inside each byte, so bit `i` of a
//! block lives in byte `i / 8` under mask `1 << (i % 8)`. Multi-bit values are
//! read as a stream in that order with the first bit as the most significant.

pub fn get_bit(buf: &[u8], index: usize) -> bool {
    buf[index / 8] & (1 << (index % 8)) != 0
}

pub fn set_bit(buf: &mut [u8], index: usize, value: bool) {
    let mask = 1u8 << (index % 8);
    if value {
        buf[index / 8] |= mask;
    } else {
        buf[index / 8] &= !mask;
    }
}

pub struct BitReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn read_bit(&mut self) -> bool {
        let bit = get_bit(self.buf, self.pos);
        self.pos += 1;
        bit
    }

    pub fn read_bits(&mut self, n: usize) -> Vec<bool> {
        (0..n).map(|_| self.read_bit()).collect()
    }

    pub fn read_uint(&mut self, n: usize) -> u64 {
        debug_assert!(n <= 64);
        (0..n).fold(0u64, |acc, _| (acc << 1) | u64::from(self.read_bit()))
    }
}

pub struct BitWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BitWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn write_bit(&mut self, value: bool) {
        set_bit(self.buf, self.pos, value);
        self.pos += 1;
    }

    pub fn write_bits(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.write_bit(bit);
        }
    }

    pub fn write_uint(&mut self, value: u64, n: usize) {
        debug_assert!(n <= 64);
        for shift in (0..n).rev() {
            self.write_bit((value >> shift) & 1 == 1);
        }
    }
}
