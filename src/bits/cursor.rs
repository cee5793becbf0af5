// Forward byte cursor over a bounded slice.
//
// The limit is the smaller of the slice length and the declared packed
// size; every read past it fails with `UnexpectedEof` instead of yielding
// zero bytes.

use crate::error::{DecodeError, Result};

#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Cursor over all of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Cursor over at most `limit` bytes of `data`.
    pub fn with_limit(data: &'a [u8], limit: usize) -> Self {
        Self {
            data: &data[..limit.min(data.len())],
            pos: 0,
        }
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left before the limit.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Total readable length.
    #[inline]
    pub fn limit(&self) -> usize {
        self.data.len()
    }

    /// Consume `n` bytes, returning them as a slice.
    #[inline]
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(DecodeError::UnexpectedEof {
                position: self.pos,
                needed: n - self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Consume up to `n` bytes; shorter only when the limit is reached.
    pub fn take_up_to(&mut self, n: usize) -> &'a [u8] {
        let n = n.min(self.remaining());
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        out
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    #[inline]
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    #[inline]
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    #[inline]
    pub fn read_u32_be(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Skip whatever is left before the limit. Returns the count skipped.
    pub fn skip_rest(&mut self) -> usize {
        let n = self.remaining();
        self.pos = self.data.len();
        n
    }
}
