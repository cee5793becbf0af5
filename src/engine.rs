// Codec dispatch: one entry point over every decoder in the crate.
//
// Callers (archive readers, the CLI, batch jobs) pick a `Codec`, hand over
// the packed bytes plus whatever sizes the container declares, and get back
// either the output or a failure carrying the partial output if asked for.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};

use crate::error::DecodeError;
use crate::rle::{self, Ending};
use crate::{cine, hlz, lzs, prince};

// ---------------------------------------------------------------------------
// Codec registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Lzs,
    Cine,
    Hlz,
    Prince,
    RleForward,
    RleReverse,
    Lobit,
    Slwm,
    PackBits,
    Pattern,
}

impl Codec {
    pub const ALL: [Codec; 10] = [
        Codec::Lzs,
        Codec::Cine,
        Codec::Hlz,
        Codec::Prince,
        Codec::RleForward,
        Codec::RleReverse,
        Codec::Lobit,
        Codec::Slwm,
        Codec::PackBits,
        Codec::Pattern,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Lzs => "lzs",
            Self::Cine => "cine",
            Self::Hlz => "hlz",
            Self::Prince => "prince",
            Self::RleForward => "rle",
            Self::RleReverse => "rle-reverse",
            Self::Lobit => "lobit",
            Self::Slwm => "slwm",
            Self::PackBits => "packbits",
            Self::Pattern => "pattern",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Lzs => "SCI LZS: MSB-first literal/copy tokens with 7/11-bit offsets",
            Self::Cine => "Delphine CineUnpack: backward fill, CRC-checked footer",
            Self::Hlz => "Cryo HLZ: 32-bit flag register, short/long repeats",
            Self::Prince => "Prince LZ: gated literals and table-coded copies",
            Self::RleForward => "count+value runs, forward fill",
            Self::RleReverse => "count+value runs, filled from the end",
            Self::Lobit => "runs plus bit-packed low-bit groups of eight",
            Self::Slwm => "self-referential expansion with 16-bit LSB-first flags",
            Self::PackBits => "ByteRun1 / PackBits (PBM, ILBM)",
            Self::Pattern => "tagged pattern commands (raw, fill, pair, zero, ramp, back)",
        }
    }

    /// Whether the decoder cannot run without a declared output size.
    pub fn requires_size(self) -> bool {
        matches!(
            self,
            Self::Lzs
                | Self::Prince
                | Self::RleForward
                | Self::RleReverse
                | Self::Lobit
                | Self::Pattern
        )
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown codec '{0}'")]
pub struct UnknownCodec(pub String);

impl FromStr for Codec {
    type Err = UnknownCodec;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Codec::ALL
            .into_iter()
            .find(|c| c.name() == lower)
            .ok_or(UnknownCodec(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Options and results
// ---------------------------------------------------------------------------

/// Sizes declared by the container, plus failure handling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Declared uncompressed size.
    pub expected_size: Option<usize>,
    /// Declared compressed size; reads past it count as truncation.
    pub packed_size: Option<usize>,
    /// Return the partially decoded output alongside errors.
    pub keep_partial: bool,
}

impl DecodeOptions {
    pub fn with_expected_size(mut self, size: usize) -> Self {
        self.expected_size = Some(size);
        self
    }

    pub fn with_packed_size(mut self, size: usize) -> Self {
        self.packed_size = Some(size);
        self
    }

    pub fn keep_partial(mut self, keep: bool) -> Self {
        self.keep_partial = keep;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub data: Vec<u8>,
    /// Input ran out before the output was complete (run-length codecs only).
    pub truncated: bool,
}

/// A failed decode, optionally with whatever had been produced.
#[derive(Debug, thiserror::Error)]
#[error("{codec}: {source}")]
pub struct DecodeFailure {
    pub codec: Codec,
    #[source]
    pub source: DecodeError,
    pub partial: Option<Vec<u8>>,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Decode `input` with `codec`.
pub fn decode(codec: Codec, input: &[u8], opts: &DecodeOptions) -> Result<Decoded, DecodeFailure> {
    let fail = |source: DecodeError, partial: Vec<u8>| DecodeFailure {
        codec,
        source,
        partial: opts.keep_partial.then_some(partial),
    };
    let size = || {
        opts.expected_size
            .ok_or_else(|| fail(DecodeError::MissingParameter("expected output size"), Vec::new()))
    };
    let input = match opts.packed_size {
        Some(n) => &input[..n.min(input.len())],
        None => input,
    };

    let result = match codec {
        Codec::Lzs => {
            let mut out = vec![0u8; size()?];
            match lzs::decompress_into(input, input.len(), &mut out) {
                Ok(_) => complete(out),
                Err(e) => return Err(fail(e, out)),
            }
        }
        Codec::Cine => {
            let len = cine::unpacked_len(input).map_err(|e| fail(e, Vec::new()))?;
            if let Some(expected) = opts.expected_size
                && expected != len
            {
                let source = DecodeError::LengthMismatch {
                    expected,
                    actual: len,
                };
                return Err(fail(source, Vec::new()));
            }
            let mut out = vec![0u8; len];
            match cine::unpack_into(input, &mut out) {
                Ok(_) => complete(out),
                Err(e) => return Err(fail(e, out)),
            }
        }
        Codec::Hlz => {
            let mut out = Vec::new();
            match hlz::decode_into(input, opts.packed_size, &mut out, opts.expected_size) {
                Ok(_) => match opts.expected_size {
                    Some(expected) if out.len() != expected => {
                        let actual = out.len();
                        return Err(fail(DecodeError::LengthMismatch { expected, actual }, out));
                    }
                    _ => complete(out),
                },
                Err(e) => return Err(fail(e, out)),
            }
        }
        Codec::Prince => {
            let mut out = vec![0u8; size()?];
            match prince::decompress_into(input, &mut out) {
                Ok(_) => complete(out),
                Err(e) => return Err(fail(e, out)),
            }
        }
        Codec::RleForward => {
            let size = size()?;
            let mut out = Vec::new();
            let ending = rle::runs::decode_forward_into(input, size, &mut out);
            filled(ending, out)
        }
        Codec::RleReverse => {
            let size = size()?;
            let mut out = Vec::new();
            let ending = rle::runs::decode_reverse_into(input, size, &mut out);
            filled(ending, out)
        }
        Codec::Lobit => {
            let size = size()?;
            let mut out = Vec::new();
            let ending = rle::lobit::decode_into(input, size, &mut out);
            filled(ending, out)
        }
        Codec::Slwm => {
            let mut out = Vec::new();
            match rle::slwm::decode_into(input, opts.expected_size, &mut out) {
                Ok(ending) => filled(ending, out),
                Err(e) => return Err(fail(e, out)),
            }
        }
        Codec::PackBits => {
            let mut out = Vec::new();
            let ending = rle::packbits::decode_into(input, opts.expected_size, &mut out);
            filled(ending, out)
        }
        Codec::Pattern => {
            let size = size()?;
            let mut out = Vec::new();
            match rle::pattern::decode_into(input, size, &mut out) {
                Ok(ending) => filled(ending, out),
                Err(e) => return Err(fail(e, out)),
            }
        }
    };

    if result.truncated {
        warn!(
            "{codec}: input ended early, {} of {} bytes produced",
            result.data.len(),
            opts.expected_size
                .map_or_else(|| "?".to_string(), |s| s.to_string())
        );
    }
    debug!(
        "{codec}: {} packed bytes -> {} bytes",
        input.len(),
        result.data.len()
    );
    Ok(result)
}

fn complete(data: Vec<u8>) -> Decoded {
    Decoded {
        data,
        truncated: false,
    }
}

fn filled(ending: Ending, data: Vec<u8>) -> Decoded {
    Decoded {
        data,
        truncated: ending.is_truncated(),
    }
}

// ---------------------------------------------------------------------------
// Batch decoding
// ---------------------------------------------------------------------------

/// One independent decode in a batch.
#[derive(Debug, Clone)]
pub struct Job<'a> {
    pub codec: Codec,
    pub input: &'a [u8],
    pub options: DecodeOptions,
}

/// Decode independent entries; results keep the order of `jobs`.
///
/// With the `parallel` feature the entries are spread over rayon's pool.
pub fn decode_batch(jobs: &[Job<'_>]) -> Vec<Result<Decoded, DecodeFailure>> {
    let run = |(i, job): (usize, &Job<'_>)| {
        let result = decode(job.codec, job.input, &job.options);
        if let Err(e) = &result {
            debug!("batch entry {i}: {e}");
        }
        result
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        jobs.par_iter().enumerate().map(run).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        jobs.iter().enumerate().map(run).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
