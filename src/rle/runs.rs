// Count+value run-length decoding (Bubsy-style).
//
// Each token is two bytes, `count` then `value`; the value is written
// `count + 1` times. The forward variant fills from index 0 upwards, the
// reverse variant from the last index downwards. Runs longer than the
// space left are clipped.

use super::{Ending, Fill, reserve_hint};
use crate::bits::ByteCursor;

pub fn decode_forward(input: &[u8], size: usize) -> Fill {
    let mut out = Vec::new();
    decode_forward_into(input, size, &mut out).into_fill(out, Some(size))
}

/// Forward fill into `out`, replacing its contents.
pub fn decode_forward_into(input: &[u8], size: usize, out: &mut Vec<u8>) -> Ending {
    out.clear();
    out.reserve(reserve_hint(Some(size), input.len()));
    fill_runs(&mut ByteCursor::new(input), size, out)
}

pub fn decode_reverse(input: &[u8], size: usize) -> Fill {
    let mut out = Vec::new();
    decode_reverse_into(input, size, &mut out).into_fill(out, Some(size))
}

/// Reverse fill into `out`, replacing its contents.
///
/// A truncated result holds the tail of the output: the runs that were
/// decoded, in their final positions relative to the end.
pub fn decode_reverse_into(input: &[u8], size: usize, out: &mut Vec<u8>) -> Ending {
    out.clear();
    out.reserve(reserve_hint(Some(size), input.len()));
    // Runs are uniform, so filling upwards and reversing once equals
    // filling downwards from the last index.
    let ending = fill_runs(&mut ByteCursor::new(input), size, out);
    out.reverse();
    ending
}

fn fill_runs(src: &mut ByteCursor<'_>, size: usize, out: &mut Vec<u8>) -> Ending {
    while out.len() < size {
        let (Ok(count), Ok(value)) = (src.read_u8(), src.read_u8()) else {
            return Ending::Truncated;
        };
        let run = (usize::from(count) + 1).min(size - out.len());
        out.resize(out.len() + run, value);
    }
    Ending::Complete
}
