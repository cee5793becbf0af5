// File-level helpers around `engine::decode`.
//
// The packed file is read fully into memory (every codec needs random
// access to its input or its footer), the output is written through a
// `BufWriter`. With the `file-io` feature a SHA-256 of the output is
// computed as it is written.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[cfg(feature = "file-io")]
use sha2::Digest;

use crate::engine::{self, Codec, DecodeFailure, DecodeOptions};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `decode_file()`.
#[derive(Debug, Clone)]
pub struct DecodeStats {
    pub codec: Codec,
    /// Packed file size in bytes.
    pub input_size: u64,
    /// Bytes produced (and written, unless check-only).
    pub output_size: u64,
    /// A run-length codec ran out of input before the declared size.
    pub truncated: bool,
    /// SHA-256 of the output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The decode failed. When partial output was kept it has already been
    /// written; `written` is its length.
    #[error("decode error: {failure}")]
    Decode {
        #[source]
        failure: DecodeFailure,
        written: Option<u64>,
    },
}

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// decode_file
// ---------------------------------------------------------------------------

/// Decode `input_path` with `codec`, writing to `output_path`.
///
/// With `output_path` set to `None` the data is decoded and hashed but not
/// written. If `opts.keep_partial` is set and the decode fails, the partial
/// output is still written before the error is returned.
pub fn decode_file(
    input_path: &Path,
    output_path: Option<&Path>,
    codec: Codec,
    opts: &DecodeOptions,
) -> Result<DecodeStats, FileError> {
    let input = std::fs::read(input_path)?;
    let input_size = input.len() as u64;

    let decoded = match engine::decode(codec, &input, opts) {
        Ok(decoded) => decoded,
        Err(mut failure) => {
            let written = match (output_path, failure.partial.take()) {
                (Some(path), Some(partial)) => {
                    write_output(path, &partial)?;
                    let n = partial.len() as u64;
                    failure.partial = Some(partial);
                    Some(n)
                }
                (_, partial) => {
                    failure.partial = partial;
                    None
                }
            };
            return Err(FileError::Decode { failure, written });
        }
    };

    let output_sha256 = match output_path {
        Some(path) => write_output(path, &decoded.data)?,
        None => digest(&decoded.data),
    };

    Ok(DecodeStats {
        codec,
        input_size,
        output_size: decoded.data.len() as u64,
        truncated: decoded.truncated,
        output_sha256,
    })
}

fn write_output(path: &Path, data: &[u8]) -> io::Result<Option<[u8; 32]>> {
    let file = File::create(path)?;
    let mut writer = BufWriter::with_capacity(BUF_SIZE, file);

    #[cfg(feature = "file-io")]
    {
        let mut hasher = sha2::Sha256::new();
        let mut hashing = HashingWriter {
            inner: &mut writer,
            hasher: &mut hasher,
        };
        hashing.write_all(data)?;
        writer.flush()?;
        Ok(Some(hasher.finalize().into()))
    }

    #[cfg(not(feature = "file-io"))]
    {
        writer.write_all(data)?;
        writer.flush()?;
        Ok(None)
    }
}

#[cfg(feature = "file-io")]
fn digest(data: &[u8]) -> Option<[u8; 32]> {
    Some(sha2::Sha256::digest(data).into())
}

#[cfg(not(feature = "file-io"))]
fn digest(_data: &[u8]) -> Option<[u8; 32]> {
    None
}

// ---------------------------------------------------------------------------
// Hashing writer (used with file-io feature)
// ---------------------------------------------------------------------------

#[cfg(feature = "file-io")]
struct HashingWriter<'a, W: Write> {
    inner: &'a mut W,
    hasher: &'a mut sha2::Sha256,
}

#[cfg(feature = "file-io")]
impl<W: Write> Write for HashingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
