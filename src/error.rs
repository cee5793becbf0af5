// Decoder error taxonomy.
//
// Shared by every decoder in the crate:
//   - truncated input         -> UnexpectedEof
//   - bounds violations       -> SourceOutOfBounds / OutputOverflow
//   - undefined stream states -> Malformed
//   - end-state checks        -> LengthMismatch / ChecksumMismatch

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// A bit or byte refill was requested past the end of the input.
    #[error("unexpected end of stream at input offset {position} (needed {needed} more byte(s))")]
    UnexpectedEof { position: usize, needed: usize },

    /// A back-reference points outside the bytes decoded so far.
    #[error("back-reference out of bounds: distance {distance} at output position {position}")]
    SourceOutOfBounds { position: usize, distance: isize },

    /// A token would write past the declared output size.
    #[error("output overflow: token writes past the declared size of {limit} bytes")]
    OutputOverflow { limit: usize },

    /// A control code or table state the format does not define.
    #[error("malformed stream: {0}")]
    Malformed(&'static str),

    /// The stream ended but the output length disagrees with the declared size.
    #[error("length mismatch: expected {expected} bytes, decoded {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The running checksum did not cancel out at the end of the stream.
    #[error("checksum mismatch: residue {residue:#010X}")]
    ChecksumMismatch { residue: u32 },

    /// A container header or footer is unusable.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The caller did not supply a parameter this codec cannot run without.
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// True for errors caused by running out of input.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. })
    }
}

pub type Result<T, E = DecodeError> = std::result::Result<T, E>;
