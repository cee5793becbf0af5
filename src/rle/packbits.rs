// ByteRun1 / PackBits, as used by DPaint PBM and ILBM bodies.
//
// Header byte h (signed):
//   0..=127     copy the next h + 1 bytes literally
//   -127..=-1   repeat the next byte 1 - h times
//   -128        no operation

use super::{Ending, Fill, reserve_hint};
use crate::bits::ByteCursor;

/// Decode until `size` bytes are produced, or until input ends when `size`
/// is `None`.
pub fn decode(input: &[u8], size: Option<usize>) -> Fill {
    let mut out = Vec::new();
    decode_into(input, size, &mut out).into_fill(out, size)
}

/// Decode into `out`, replacing its contents.
pub fn decode_into(input: &[u8], size: Option<usize>, out: &mut Vec<u8>) -> Ending {
    out.clear();
    out.reserve(reserve_hint(size, input.len()));
    let mut src = ByteCursor::new(input);
    let room = |out: &Vec<u8>| size.map_or(usize::MAX, |s| s.saturating_sub(out.len()));

    while room(out) > 0 {
        let Ok(header) = src.read_u8() else {
            break;
        };
        match header as i8 {
            -128 => {}
            h @ 0..=127 => {
                let want = (h as usize + 1).min(room(out));
                let bytes = src.take_up_to(want);
                out.extend_from_slice(bytes);
                if bytes.len() < want {
                    return Ending::Truncated;
                }
            }
            h => {
                let Ok(value) = src.read_u8() else {
                    return Ending::Truncated;
                };
                let n = ((1 - isize::from(h)) as usize).min(room(out));
                out.resize(out.len() + n, value);
            }
        }
    }

    match size {
        Some(s) if out.len() < s => Ending::Truncated,
        _ => Ending::Complete,
    }
}
