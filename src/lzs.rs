// SCI "LZS" decompressor (STACpack-style LZ with an MSB-first bit stream).
//
// Token grammar:
//   0 bbbbbbbb            literal byte
//   1 1 ooooooo  <len>    copy, 7-bit offset; offset 0 is the end marker
//   1 0 ooooooooooo <len> copy, 11-bit offset
//
// Length code:
//   00 -> 2, 01 -> 3, 10 -> 4,
//   11 00 -> 5, 11 01 -> 6, 11 10 -> 7,
//   11 11 then nibbles added to 8 while each nibble is 0xF.

use crate::bits::{ByteCursor, MsbBitReader};
use crate::error::{DecodeError, Result};
use crate::window::FixedWindow;

const SHORT_OFFSET_BITS: u32 = 7;
const LONG_OFFSET_BITS: u32 = 11;

/// Decompress into a freshly allocated buffer of `unpacked_size` bytes.
pub fn decompress(input: &[u8], packed_size: usize, unpacked_size: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; unpacked_size];
    decompress_into(input, packed_size, &mut out)?;
    Ok(out)
}

/// Decompress into `out`, whose length is the declared unpacked size.
///
/// At most `packed_size` bytes of `input` are read. Returns the number of
/// bytes written. On error, everything decoded so far is left in `out`.
pub fn decompress_into(input: &[u8], packed_size: usize, out: &mut [u8]) -> Result<usize> {
    let cursor = ByteCursor::with_limit(input, packed_size);
    let packed_limit = cursor.limit();
    let mut bits = MsbBitReader::from_cursor(cursor);
    let expected = out.len();
    let mut window = FixedWindow::new(out);

    while !(window.is_full() && bits.bytes_consumed() >= packed_limit) {
        if !bits.read_bit()? {
            let literal = bits.read_bits(8)? as u8;
            window.push(literal)?;
            continue;
        }

        let offset = if bits.read_bit()? {
            let offset = bits.read_bits(SHORT_OFFSET_BITS)?;
            if offset == 0 {
                break;
            }
            offset
        } else {
            bits.read_bits(LONG_OFFSET_BITS)?
        };
        let len = read_length(&mut bits)?;
        window.copy_back(offset as usize, len)?;
    }

    let written = window.pos();
    if written != expected {
        return Err(DecodeError::LengthMismatch {
            expected,
            actual: written,
        });
    }
    Ok(written)
}

fn read_length(bits: &mut MsbBitReader<'_>) -> Result<usize> {
    let sel = bits.read_bits(2)?;
    if sel < 3 {
        return Ok(sel as usize + 2);
    }
    let sel = bits.read_bits(2)?;
    if sel < 3 {
        return Ok(sel as usize + 5);
    }
    let mut len = 8usize;
    loop {
        let nibble = bits.read_bits(4)?;
        len += nibble as usize;
        if nibble != 0xF {
            return Ok(len);
        }
    }
}
