// Run-length family decoders.
//
// These formats tolerate short input: running out of compressed bytes stops
// decoding and yields `Fill::Truncated` with everything produced so far,
// rather than an error or an unmarked short buffer. Bounds violations and
// undefined control codes are still hard errors. The `*_into` forms write
// into a caller-owned `Vec` (replacing its contents), so the bytes produced
// before a hard error stay available.
//
// - `runs`     : count+value runs, forward and reverse fill
// - `lobit`    : runs plus bit-packed groups of eight 7-bit tokens
// - `slwm`     : LZ-style self-referential expansion into a growable buffer
// - `packbits` : ByteRun1 (PBM/ILBM bodies)
// - `pattern`  : tagged pattern commands dispatched over a closed enum

pub mod lobit;
pub mod packbits;
pub mod pattern;
pub mod runs;
pub mod slwm;

use crate::error::{DecodeError, Result};

/// Outcome of a tolerant decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fill {
    /// Output reached its declared size (or the stream's end marker).
    Complete(Vec<u8>),
    /// Input ran out first. `data` holds the bytes produced, in output order.
    Truncated {
        data: Vec<u8>,
        expected: Option<usize>,
    },
}

impl Fill {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    pub fn is_truncated(&self) -> bool {
        !self.is_complete()
    }

    pub fn data(&self) -> &[u8] {
        match self {
            Self::Complete(data) | Self::Truncated { data, .. } => data,
        }
    }

    /// The produced bytes, complete or not.
    pub fn into_inner(self) -> Vec<u8> {
        match self {
            Self::Complete(data) | Self::Truncated { data, .. } => data,
        }
    }

    /// Treat truncation as an error.
    pub fn require_complete(self) -> Result<Vec<u8>> {
        match self {
            Self::Complete(data) => Ok(data),
            Self::Truncated { data, expected } => Err(DecodeError::UnexpectedEof {
                position: data.len(),
                needed: expected.map_or(1, |e| e.saturating_sub(data.len()).max(1)),
            }),
        }
    }
}

/// How a decode into caller memory ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Complete,
    Truncated,
}

impl Ending {
    pub fn is_truncated(self) -> bool {
        self == Self::Truncated
    }

    /// Pair the produced bytes with this ending.
    pub fn into_fill(self, data: Vec<u8>, expected: Option<usize>) -> Fill {
        match self {
            Self::Complete => Fill::Complete(data),
            Self::Truncated => Fill::Truncated { data, expected },
        }
    }
}

/// Upper bound for up-front output reservations.
///
/// Declared sizes come from untrusted headers, so the buffer starts no
/// larger than this and grows as bytes are actually produced.
const MAX_RESERVE: usize = 1 << 20;

pub(crate) fn reserve_hint(expected: Option<usize>, input_len: usize) -> usize {
    expected
        .unwrap_or(input_len.saturating_mul(2))
        .min(MAX_RESERVE)
}

/// Classify the result of a decode loop that produced `produced` bytes.
///
/// Running out of input becomes `Truncated`; every other error propagates.
/// A loop that finished cleanly but short of `expected` is also truncated.
pub(crate) fn settle(outcome: Result<()>, produced: usize, expected: Option<usize>) -> Result<Ending> {
    match outcome {
        Ok(()) => Ok(match expected {
            Some(size) if produced < size => Ending::Truncated,
            _ => Ending::Complete,
        }),
        Err(e) if e.is_truncation() => Ok(Ending::Truncated),
        Err(e) => Err(e),
    }
}
