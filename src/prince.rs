// "Prince" LZ decompressor.
//
// Control bits come from a byte-wide register consumed from the top bit
// and reloaded from the next input byte when empty; literal bytes are read
// from the same stream in between.
//
// One iteration:
//   - up to six literals, each gated by a `1` flag (a `0` flag ends the
//     group early);
//   - if all six fired, a `TABLE3` code gives a count of further literals;
//   - unless the loop is done, one back-reference:
//       length   = TABLE1 code + 2
//       row      = next 3 flags, selects a TABLE2 entry
//       distance = entry bias + extra bits + 1
//
// The loop runs while `pos + 1 < size`, so the final output byte is only
// produced if some token of the last iteration covers it.

use crate::bits::{ByteCursor, FlagOrder, FlagReader, FlagUnit};
use crate::error::Result;
use crate::window::FixedWindow;

/// Gated literals per iteration before the run-length extension kicks in.
pub const LITERAL_GATES: usize = 6;

/// Back-reference lengths: (threshold, base). Row `k` reads `k + 1` extra bits.
pub const TABLE1: [(u16, u16); 10] = [
    (0x8000, 0x0002),
    (0x4000, 0x0004),
    (0x2000, 0x0008),
    (0x1000, 0x0010),
    (0x0800, 0x0020),
    (0x0400, 0x0040),
    (0x0200, 0x0080),
    (0x0100, 0x0100),
    (0x0080, 0x0200),
    (0x0040, 0x0400),
];

/// Distance rows: high half is the bias, low half seeds the extra-bit shifter
/// (one extra bit per leading one, plus the terminating zero).
pub const TABLE2: [u32; 8] = [
    0x0000_F000,
    0x0020_FC00,
    0x00A0_FF00,
    0x02A0_FF80,
    0x06A0_FFC0,
    0x0EA0_FFE0,
    0x1EA0_FFF0,
    0x3EA0_FFF8,
];

/// Literal run extension: (threshold, base). Row `k` reads `k + 1` extra bits.
pub const TABLE3: [(u16, u16); 16] = [
    (0x8000, 0x0000),
    (0x4000, 0x0002),
    (0x2000, 0x0006),
    (0x1000, 0x000E),
    (0x0800, 0x001E),
    (0x0400, 0x003E),
    (0x0200, 0x007E),
    (0x0100, 0x00FE),
    (0x0080, 0x01FE),
    (0x0040, 0x03FE),
    (0x0020, 0x07FE),
    (0x0010, 0x0FFE),
    (0x0008, 0x1FFE),
    (0x0004, 0x3FFE),
    (0x0002, 0x7FFE),
    (0x0001, 0xFFFE),
];

/// Bias added to every `TABLE1` length.
pub const LENGTH_BIAS: usize = 2;

pub fn decompress(input: &[u8], size: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; size];
    decompress_into(input, &mut out)?;
    Ok(out)
}

/// Decompress into `out` (length = declared size). Returns bytes written.
pub fn decompress_into(input: &[u8], out: &mut [u8]) -> Result<usize> {
    let mut flags = FlagReader::new(ByteCursor::new(input), FlagUnit::U8, FlagOrder::TopFirst);
    let mut window = FixedWindow::new(out);

    while window.pos() + 1 < window.len() {
        let mut taken = 0;
        while taken < LITERAL_GATES && flags.bit()? {
            window.push(flags.byte()?)?;
            taken += 1;
        }
        if taken == LITERAL_GATES {
            let extra = read_code(&mut flags, &TABLE3)?;
            for _ in 0..extra {
                window.push(flags.byte()?)?;
            }
        }
        if window.pos() + 1 >= window.len() {
            break;
        }

        let len = read_code(&mut flags, &TABLE1)? as usize + LENGTH_BIAS;
        let row = flags.bits(3)? as usize;
        let distance = read_distance(&mut flags, TABLE2[row])?;
        window.copy_back(distance, len)?;
    }
    Ok(window.pos())
}

/// Unary row prefix (ones, capped at the last row) then the row's extra bits.
fn read_code(flags: &mut FlagReader<'_>, table: &[(u16, u16)]) -> Result<u32> {
    let mut row = 0;
    while row + 1 < table.len() && flags.bit()? {
        row += 1;
    }
    let (mut threshold, base) = table[row];
    let mut extra = 0u32;
    loop {
        extra = (extra << 1) | u32::from(flags.bit()?);
        if threshold & 0x8000 != 0 {
            break;
        }
        threshold <<= 1;
    }
    Ok(u32::from(base) + extra)
}

fn read_distance(flags: &mut FlagReader<'_>, entry: u32) -> Result<usize> {
    let bias = (entry >> 16) as usize;
    let mut acc = entry & 0xFFFF;
    loop {
        let carry = acc & 0x8000;
        acc = ((acc << 1) | u32::from(flags.bit()?)) & 0xFFFF;
        if carry == 0 {
            break;
        }
    }
    Ok(bias + acc as usize + 1)
}
