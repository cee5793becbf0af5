// MSB-first bit reader.
//
// Bits come out starting from the most significant unconsumed bit. The
// register is refilled one byte at a time and only as far as the current
// request needs, so the byte count reported by `bytes_consumed` is exact.

use super::cursor::ByteCursor;
use crate::error::Result;

/// Widest field a single `read_bits` call may request.
pub const MAX_READ_BITS: u32 = 32;

#[derive(Debug, Clone)]
pub struct MsbBitReader<'a> {
    cursor: ByteCursor<'a>,
    /// Only the low `valid` bits are meaningful.
    reg: u64,
    valid: u32,
}

impl<'a> MsbBitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::from_cursor(ByteCursor::new(data))
    }

    pub fn from_cursor(cursor: ByteCursor<'a>) -> Self {
        Self {
            cursor,
            reg: 0,
            valid: 0,
        }
    }

    /// Read `n` bits (1..=32) as an unsigned value.
    pub fn read_bits(&mut self, n: u32) -> Result<u32> {
        debug_assert!((1..=MAX_READ_BITS).contains(&n));
        while self.valid < n {
            let byte = self.cursor.read_u8()?;
            self.reg = (self.reg << 8) | u64::from(byte);
            self.valid += 8;
        }
        self.valid -= n;
        let value = (self.reg >> self.valid) & ((1u64 << n) - 1);
        self.reg &= (1u64 << self.valid) - 1;
        Ok(value as u32)
    }

    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Whole bytes pulled from the input so far.
    pub fn bytes_consumed(&self) -> usize {
        self.cursor.position()
    }

    /// Bits buffered but not yet returned.
    pub fn bits_buffered(&self) -> u32 {
        self.valid
    }
}
