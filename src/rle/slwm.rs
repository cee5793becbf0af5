// Self-referential expansion ("SLWM") into a growable buffer.
//
// Flags are 16-bit little-endian words consumed from bit 0; the next word is
// loaded only when a flag is needed, and data bytes are read from the same
// stream in between.
//
//   1                   literal byte
//   0 0 a b <byte>      run: count = 2a + b, start = 0x100 - byte
//   0 1 <lo> <hi>       run: start = 0x1000 - (lo | (hi & 0xF0) << 4),
//                       count = hi & 0x0F; count 0 reads an extension byte,
//                       where 0 marks the end of the stream
//
// A run copies `count + 2` bytes from `output[len - start]` onwards, one
// byte at a time. With no declared size the output grows until the end
// marker; with one, reaching it stops decoding.

use super::{Ending, Fill, reserve_hint, settle};
use crate::bits::{ByteCursor, FlagOrder, FlagReader, FlagUnit};
use crate::error::Result;
use crate::window::copy_back_vec;

pub fn decode(input: &[u8], expected: Option<usize>) -> Result<Fill> {
    let mut out = Vec::new();
    let ending = decode_into(input, expected, &mut out)?;
    Ok(ending.into_fill(out, expected))
}

/// Decode into `out`, replacing its contents. On error `out` holds the bytes
/// expanded so far.
pub fn decode_into(input: &[u8], expected: Option<usize>, out: &mut Vec<u8>) -> Result<Ending> {
    out.clear();
    out.reserve(reserve_hint(expected, input.len()));
    let mut flags = FlagReader::new(ByteCursor::new(input), FlagUnit::U16Le, FlagOrder::LowFirst);
    let outcome = expand(&mut flags, out, expected);
    settle(outcome, out.len(), expected)
}

fn expand(flags: &mut FlagReader<'_>, out: &mut Vec<u8>, expected: Option<usize>) -> Result<()> {
    let room = |out: &Vec<u8>| expected.map_or(usize::MAX, |size| size.saturating_sub(out.len()));

    while room(out) > 0 {
        if flags.bit()? {
            out.push(flags.byte()?);
            continue;
        }

        let (start, count) = if !flags.bit()? {
            let count = flags.bits(2)? as usize;
            let start = 0x100 - usize::from(flags.byte()?);
            (start, count)
        } else {
            let lo = usize::from(flags.byte()?);
            let hi = usize::from(flags.byte()?);
            let start = 0x1000 - (lo | (hi & 0xF0) << 4);
            let mut count = hi & 0x0F;
            if count == 0 {
                count = usize::from(flags.byte()?);
                if count == 0 {
                    break;
                }
            }
            (start, count)
        };

        let len = (count + 2).min(room(out));
        copy_back_vec(out, 0, start, len, None)?;
    }
    Ok(())
}
