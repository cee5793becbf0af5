// Rotate-through-carry bit source for backward-packed streams.
//
// Words are big-endian u32 read from the end of the input towards its
// start. Bits leave the register from the low end; when the register
// empties, the next word is loaded, XORed into the running CRC, and a
// marker bit is rotated in at the top so that "register == 0" again means
// "exhausted". A well-formed stream leaves the CRC at zero.

use crate::error::{DecodeError, Result};

#[derive(Debug, Clone)]
pub struct CarryBitReader<'a> {
    data: &'a [u8],
    /// Exclusive end of the next word to load.
    end: usize,
    chunk: u32,
    crc: u32,
}

impl<'a> CarryBitReader<'a> {
    /// Start reading backwards from `end` with `chunk` already loaded.
    ///
    /// `crc` is the running checksum *after* `chunk` was folded into it.
    pub fn new(data: &'a [u8], end: usize, chunk: u32, crc: u32) -> Self {
        Self {
            data,
            end: end.min(data.len()),
            chunk,
            crc,
        }
    }

    fn load_word(&mut self) -> Result<u32> {
        if self.end < 4 {
            return Err(DecodeError::UnexpectedEof {
                position: self.end,
                needed: 4 - self.end,
            });
        }
        let b = &self.data[self.end - 4..self.end];
        self.end -= 4;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Next bit; loads and checksums a new word once the register is drained.
    pub fn bit(&mut self) -> Result<bool> {
        let mut carry = self.chunk & 1 != 0;
        self.chunk >>= 1;
        if self.chunk == 0 {
            let word = self.load_word()?;
            self.crc ^= word;
            carry = word & 1 != 0;
            self.chunk = (word >> 1) | 0x8000_0000;
        }
        Ok(carry)
    }

    /// `n` bits, first bit most significant.
    pub fn read_bits(&mut self, n: u32) -> Result<u32> {
        let mut value = 0u32;
        for _ in 0..n {
            value = (value << 1) | u32::from(self.bit()?);
        }
        Ok(value)
    }

    pub fn crc(&self) -> u32 {
        self.crc
    }

    /// Input bytes not yet loaded (everything before the read position).
    pub fn words_left(&self) -> usize {
        self.end / 4
    }
}
