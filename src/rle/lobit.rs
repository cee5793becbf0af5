// Run-length decoding with bit-packed low-bit groups.
//
// Control byte `c`:
//   c & 0x80 == 0   run token: value = next byte, written c + 1 times
//   c & 0x80 != 0   group of eight: mask = next byte, then seven more token
//                   bytes; output byte i is (token_i << 1) | mask bit i,
//                   mask bits taken MSB-first, token_0 = c
//
// Decoding stops as soon as the declared size is reached, even mid-group.

use super::{Ending, Fill, reserve_hint};
use crate::bits::ByteCursor;
use crate::error::Result;

const GROUP_LEN: usize = 8;

pub fn decode(input: &[u8], size: usize) -> Fill {
    let mut out = Vec::new();
    decode_into(input, size, &mut out).into_fill(out, Some(size))
}

/// Decode into `out`, replacing its contents.
pub fn decode_into(input: &[u8], size: usize, out: &mut Vec<u8>) -> Ending {
    out.clear();
    out.reserve(reserve_hint(Some(size), input.len()));
    // `run` only fails by running out of input.
    match run(&mut ByteCursor::new(input), out, size) {
        Ok(()) => Ending::Complete,
        Err(_) => Ending::Truncated,
    }
}

fn run(src: &mut ByteCursor<'_>, out: &mut Vec<u8>, size: usize) -> Result<()> {
    while out.len() < size {
        let control = src.read_u8()?;
        if control & 0x80 == 0 {
            let value = src.read_u8()?;
            let n = (usize::from(control) + 1).min(size - out.len());
            out.resize(out.len() + n, value);
            continue;
        }

        let mask = src.read_u8()?;
        let mut token = control;
        for i in 0..GROUP_LEN {
            if out.len() >= size {
                break;
            }
            if i > 0 {
                token = src.read_u8()?;
            }
            let bit = (mask >> (7 - i)) & 1;
            out.push((token << 1) | bit);
        }
    }
    Ok(())
}
