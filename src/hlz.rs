// Cryo "HLZ" decompressor.
//
// Control flags come from a 32-bit little-endian register consumed from its
// top bit; the register is reloaded only when empty, and literal/offset
// bytes are read from the same stream in between.
//
//   0                       literal byte
//   1 1 <u16 le>            long repeat: count = w & 7, offset = (w >> 3) - 0x2000
//                           count 0 -> next byte is the count, 0 = end of stream
//   1 0 a b <byte>          short repeat: count = 2a + b, offset = byte - 0x100
//
// Every repeat count is biased by +2. Offsets are negative displacements
// from the current output position.

use crate::bits::{ByteCursor, FlagOrder, FlagReader, FlagUnit};
use crate::error::Result;
use crate::window::{copy_back_vec, push_vec};

/// Decode a stream, reading at most `packed_size` bytes (or all of `input`).
pub fn decode(input: &[u8], packed_size: Option<usize>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decode_into(input, packed_size, &mut out, None)?;
    Ok(out)
}

/// Decode by appending to `out`.
///
/// `max_output` caps the number of bytes appended. Returns the number of
/// input bytes consumed, including any trailing bytes skipped after the end
/// marker when `packed_size` is given.
pub fn decode_into(
    input: &[u8],
    packed_size: Option<usize>,
    out: &mut Vec<u8>,
    max_output: Option<usize>,
) -> Result<usize> {
    let cursor = match packed_size {
        Some(limit) => ByteCursor::with_limit(input, limit),
        None => ByteCursor::new(input),
    };
    let mut flags = FlagReader::new(cursor, FlagUnit::U32Le, FlagOrder::TopFirst);
    let base = out.len();

    loop {
        if !flags.bit()? {
            let byte = flags.byte()?;
            push_vec(out, base, byte, max_output)?;
            continue;
        }

        let (count, offset) = if flags.bit()? {
            let word = flags.u16_le()?;
            let mut count = usize::from(word & 0x7);
            let offset = (word >> 3) as isize - 0x2000;
            if count == 0 {
                count = usize::from(flags.byte()?);
                if count == 0 {
                    break;
                }
            }
            (count, offset)
        } else {
            let mut count = if flags.bit()? { 2 } else { 0 };
            count |= usize::from(flags.bit()?);
            let offset = isize::from(flags.byte()?) - 0x100;
            (count, offset)
        };

        copy_back_vec(out, base, offset.unsigned_abs(), count + 2, max_output)?;
    }

    if packed_size.is_some() {
        flags.cursor_mut().skip_rest();
    }
    Ok(flags.cursor().position())
}
