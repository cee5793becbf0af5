// Pattern-command decompression (Voodoo-style).
//
// Each command byte carries a 3-bit mode in its top bits and a count in the
// low five: `count = (b & 0x1F) + 1`, except that 0x1F means "read one more
// byte, count = byte + 32". The mode picks one handler from a closed set;
// modes 6 and 7 are undefined.

use super::{Ending, Fill, reserve_hint, settle};
use crate::bits::ByteCursor;
use crate::error::{DecodeError, Result};
use crate::window::copy_back_vec;

const COUNT_MASK: u8 = 0x1F;
const EXTENDED_COUNT_BASE: usize = 32;

/// Pattern handlers, indexed by the command mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Copy `count` bytes from the input.
    Raw,
    /// Repeat one input byte `count` times.
    Fill,
    /// Repeat a two-byte pattern `count` times.
    Pair,
    /// Emit `count` zero bytes.
    Zero,
    /// Emit `count` bytes counting up (wrapping) from an input byte.
    Ramp,
    /// Copy `count` bytes from `distance` bytes back; distance is a byte + 1.
    Back,
}

impl Pattern {
    pub fn from_mode(mode: u8) -> Option<Self> {
        Some(match mode {
            0 => Self::Raw,
            1 => Self::Fill,
            2 => Self::Pair,
            3 => Self::Zero,
            4 => Self::Ramp,
            5 => Self::Back,
            _ => return None,
        })
    }

    pub fn mode(self) -> u8 {
        match self {
            Self::Raw => 0,
            Self::Fill => 1,
            Self::Pair => 2,
            Self::Zero => 3,
            Self::Ramp => 4,
            Self::Back => 5,
        }
    }

    /// Run this handler, never growing `out` past `size`.
    fn apply(self, count: usize, src: &mut ByteCursor<'_>, out: &mut Vec<u8>, size: usize) -> Result<()> {
        let room = size.saturating_sub(out.len());
        match self {
            Self::Raw => {
                let want = count.min(room);
                let bytes = src.take_up_to(want);
                out.extend_from_slice(bytes);
                if bytes.len() < want {
                    return Err(DecodeError::UnexpectedEof {
                        position: src.position(),
                        needed: want - bytes.len(),
                    });
                }
            }
            Self::Fill => {
                let value = src.read_u8()?;
                out.resize(out.len() + count.min(room), value);
            }
            Self::Pair => {
                let pair = [src.read_u8()?, src.read_u8()?];
                out.extend(pair.iter().cycle().take((count * 2).min(room)));
            }
            Self::Zero => out.resize(out.len() + count.min(room), 0),
            Self::Ramp => {
                let start = src.read_u8()?;
                out.extend((0..count.min(room)).map(|i| start.wrapping_add(i as u8)));
            }
            Self::Back => {
                let distance = usize::from(src.read_u8()?) + 1;
                copy_back_vec(out, 0, distance, count.min(room), None)?;
            }
        }
        Ok(())
    }
}

/// One decoded command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub pattern: Pattern,
    pub count: usize,
}

impl Command {
    pub fn read(src: &mut ByteCursor<'_>) -> Result<Self> {
        let b = src.read_u8()?;
        let pattern = Pattern::from_mode(b >> 5).ok_or(DecodeError::Malformed("undefined pattern mode"))?;
        let count = match b & COUNT_MASK {
            COUNT_MASK => usize::from(src.read_u8()?) + EXTENDED_COUNT_BASE,
            n => usize::from(n) + 1,
        };
        Ok(Self { pattern, count })
    }
}

pub fn decode(input: &[u8], size: usize) -> Result<Fill> {
    let mut out = Vec::new();
    let ending = decode_into(input, size, &mut out)?;
    Ok(ending.into_fill(out, Some(size)))
}

/// Decode into `out`, replacing its contents. On error `out` holds every
/// byte the earlier commands produced.
pub fn decode_into(input: &[u8], size: usize, out: &mut Vec<u8>) -> Result<Ending> {
    out.clear();
    out.reserve(reserve_hint(Some(size), input.len()));
    let mut src = ByteCursor::new(input);
    let outcome = run(&mut src, out, size);
    settle(outcome, out.len(), Some(size))
}

fn run(src: &mut ByteCursor<'_>, out: &mut Vec<u8>, size: usize) -> Result<()> {
    while out.len() < size {
        let cmd = Command::read(src)?;
        cmd.pattern.apply(cmd.count, src, out, size)?;
    }
    Ok(())
}
