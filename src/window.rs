// Output windows with bounds-checked literal and back-reference writes.
//
// Back-references are always copied one byte at a time, front to back, so a
// distance shorter than the length replicates the bytes written earlier in
// the same copy (the classic LZ77 run idiom). A bulk memmove would not.

use crate::error::{DecodeError, Result};

// ---------------------------------------------------------------------------
// Fixed-size output
// ---------------------------------------------------------------------------

/// Forward writer over a pre-sized output buffer.
pub struct FixedWindow<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> FixedWindow<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.pos >= self.buf.len()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.pos >= self.buf.len() {
            return Err(DecodeError::OutputOverflow {
                limit: self.buf.len(),
            });
        }
        self.buf[self.pos] = byte;
        self.pos += 1;
        Ok(())
    }

    /// Copy `len` bytes starting `distance` bytes behind the write position.
    pub fn copy_back(&mut self, distance: usize, len: usize) -> Result<()> {
        if distance == 0 || distance > self.pos {
            return Err(DecodeError::SourceOutOfBounds {
                position: self.pos,
                distance: -(distance as isize),
            });
        }
        if len > self.remaining() {
            return Err(DecodeError::OutputOverflow {
                limit: self.buf.len(),
            });
        }
        for _ in 0..len {
            self.buf[self.pos] = self.buf[self.pos - distance];
            self.pos += 1;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Growable output
// ---------------------------------------------------------------------------

/// Append `len` bytes copied from `distance` bytes before the end of `out`.
///
/// `base` is the index where this decode started writing; references into
/// bytes before it are rejected. `limit` caps the total bytes written since
/// `base`.
pub fn copy_back_vec(
    out: &mut Vec<u8>,
    base: usize,
    distance: usize,
    len: usize,
    limit: Option<usize>,
) -> Result<()> {
    let pos = out.len() - base;
    if distance == 0 || distance > pos {
        return Err(DecodeError::SourceOutOfBounds {
            position: pos,
            distance: -(distance as isize),
        });
    }
    if let Some(limit) = limit
        && pos + len > limit
    {
        return Err(DecodeError::OutputOverflow { limit });
    }
    out.reserve(len);
    for _ in 0..len {
        let b = out[out.len() - distance];
        out.push(b);
    }
    Ok(())
}

/// Append one byte, honouring the optional size cap.
#[inline]
pub fn push_vec(out: &mut Vec<u8>, base: usize, byte: u8, limit: Option<usize>) -> Result<()> {
    if let Some(limit) = limit
        && out.len() - base >= limit
    {
        return Err(DecodeError::OutputOverflow { limit });
    }
    out.push(byte);
    Ok(())
}
