// Delphine "CineUnpack" decompressor (a ByteKiller derivative).
//
// The packed block is consumed from its end towards its start and the
// output is filled from its last byte towards its first. Footer layout
// (big-endian u32s, last bytes of the block):
//
//   ... | first bit chunk | crc | unpacked length |
//
// Token grammar (bit fields MSB-first, built from single rcr bits):
//   0 0 ccc              raw run of ccc+1 bytes
//   0 1 oooooooo         copy 2 bytes from +offset
//   1 11 nnnnnnnn        raw run of n+9 bytes
//   1 00 o{9}            copy 3 bytes
//   1 01 o{10}           copy 4 bytes
//   1 10 nnnnnnnn o{12}  copy n+1 bytes
//
// Copies read from `dst + offset`, i.e. from bytes already produced (which
// sit at higher indices). Each copied or raw byte moves the cursor down by
// one.

use crate::bits::CarryBitReader;
use crate::error::{DecodeError, Result};

/// Size of the footer at the end of a packed block.
pub const FOOTER_LEN: usize = 12;

/// Parsed CineUnpack footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footer {
    /// Declared unpacked length.
    pub unpacked_len: u32,
    /// CRC seed as stored (before the first chunk is folded in).
    pub crc: u32,
    /// First bit chunk, already loaded when decoding starts.
    pub first_chunk: u32,
}

/// Read the footer without decoding anything.
pub fn read_footer(input: &[u8]) -> Result<Footer> {
    if input.len() < FOOTER_LEN {
        return Err(DecodeError::InvalidHeader(format!(
            "packed block of {} bytes is shorter than the {FOOTER_LEN}-byte footer",
            input.len()
        )));
    }
    let n = input.len();
    let word = |at: usize| u32::from_be_bytes([input[at], input[at + 1], input[at + 2], input[at + 3]]);
    Ok(Footer {
        unpacked_len: word(n - 4),
        crc: word(n - 8),
        first_chunk: word(n - 12),
    })
}

/// No token yields more than this many output bytes per stream bit (the
/// long copy: 256 bytes from 23 bits).
const MAX_BYTES_PER_BIT: usize = 12;

/// The footer's unpacked length, rejected when the block is too small to
/// ever produce it.
pub fn unpacked_len(input: &[u8]) -> Result<usize> {
    let footer = read_footer(input)?;
    checked_len(&footer, input.len())
}

fn checked_len(footer: &Footer, packed_len: usize) -> Result<usize> {
    let len = footer.unpacked_len as usize;
    // Payload words plus the first chunk.
    let bits = (packed_len - FOOTER_LEN + 4).saturating_mul(8);
    if len > bits.saturating_mul(MAX_BYTES_PER_BIT) {
        return Err(DecodeError::InvalidHeader(format!(
            "unpacked length {len} is out of reach for a {packed_len}-byte block"
        )));
    }
    Ok(len)
}

/// Unpack a block whose output size comes from its own footer.
pub fn unpack(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = vec![0u8; unpacked_len(input)?];
    unpack_into(input, &mut out)?;
    Ok(out)
}

/// Unpack into `out`, which must hold at least the footer's unpacked length.
///
/// Only `out[..unpacked_len]` is written. Returns the unpacked length. On
/// error the bytes already produced (at the high end) stay in `out`.
pub fn unpack_into(input: &[u8], out: &mut [u8]) -> Result<usize> {
    let footer = read_footer(input)?;
    let len = checked_len(&footer, input.len())?;
    if len > out.len() {
        return Err(DecodeError::InvalidHeader(format!(
            "declared unpacked length {len} exceeds the {}-byte output buffer",
            out.len()
        )));
    }

    let bits = CarryBitReader::new(
        input,
        input.len() - FOOTER_LEN,
        footer.first_chunk,
        footer.crc ^ footer.first_chunk,
    );
    let mut state = Unpacker {
        bits,
        out: &mut out[..len],
        remaining: len,
    };
    state.run()?;

    let residue = state.bits.crc();
    if residue != 0 {
        return Err(DecodeError::ChecksumMismatch { residue });
    }
    Ok(len)
}

// ---------------------------------------------------------------------------
// Decoder state
// ---------------------------------------------------------------------------

struct Unpacker<'a, 'b> {
    bits: CarryBitReader<'a>,
    out: &'b mut [u8],
    /// Bytes still to write; the destination cursor is `remaining - 1`.
    remaining: usize,
}

impl Unpacker<'_, '_> {
    fn run(&mut self) -> Result<()> {
        while self.remaining > 0 {
            if !self.bits.bit()? {
                if !self.bits.bit()? {
                    let count = self.bits.read_bits(3)? as usize + 1;
                    self.raw_bytes(count)?;
                } else {
                    let offset = self.bits.read_bits(8)? as usize;
                    self.copy_relocated(offset, 2)?;
                }
            } else {
                match self.bits.read_bits(2)? {
                    3 => {
                        let count = self.bits.read_bits(8)? as usize + 9;
                        self.raw_bytes(count)?;
                    }
                    sel @ 0..=1 => {
                        let offset = self.bits.read_bits(sel + 9)? as usize;
                        self.copy_relocated(offset, sel as usize + 3)?;
                    }
                    _ => {
                        let count = self.bits.read_bits(8)? as usize + 1;
                        let offset = self.bits.read_bits(12)? as usize;
                        self.copy_relocated(offset, count)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn raw_bytes(&mut self, count: usize) -> Result<()> {
        if count > self.remaining {
            return Err(DecodeError::OutputOverflow {
                limit: self.out.len(),
            });
        }
        for _ in 0..count {
            let byte = self.bits.read_bits(8)? as u8;
            self.remaining -= 1;
            self.out[self.remaining] = byte;
        }
        Ok(())
    }

    fn copy_relocated(&mut self, offset: usize, count: usize) -> Result<()> {
        let dst = self.remaining - 1;
        if dst + offset >= self.out.len() {
            return Err(DecodeError::SourceOutOfBounds {
                position: dst,
                distance: offset as isize,
            });
        }
        if count > self.remaining {
            return Err(DecodeError::OutputOverflow {
                limit: self.out.len(),
            });
        }
        for _ in 0..count {
            let dst = self.remaining - 1;
            self.out[dst] = self.out[dst + offset];
            self.remaining -= 1;
        }
        Ok(())
    }
}
