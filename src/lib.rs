//! retrolz: decoders for the compression schemes of legacy game archives.
//!
//! The crate provides:
//! - LZ-family decoders: SCI LZS (`lzs`), Delphine CineUnpack (`cine`),
//!   Cryo HLZ (`hlz`) and Prince LZ (`prince`)
//! - Run-length family decoders (`rle`)
//! - Shared bit readers and output windows (`bits`, `window`)
//! - A codec registry with a single dispatch entry point (`engine`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! Decoders are pure functions over an input slice. Each one either fills a
//! caller-provided buffer (`*_into`) or returns a fresh `Vec<u8>`; none of
//! them log, allocate globally or keep state between calls.
//!
//! # Quick Start
//!
//! ```
//! use retrolz::engine::{self, Codec, DecodeOptions};
//!
//! // One literal 'A' followed by a two-byte copy and the end marker.
//! let packed = [0x20, 0xE0, 0x4C, 0x00];
//! let opts = DecodeOptions::default().with_expected_size(3);
//! let out = engine::decode(Codec::Lzs, &packed, &opts).unwrap();
//! assert_eq!(out.data, b"AAA");
//! ```

pub mod bits;
pub mod cine;
pub mod engine;
pub mod error;
pub mod hlz;
pub mod io;
pub mod lzs;
pub mod prince;
pub mod rle;
pub mod window;

#[cfg(feature = "cli")]
pub mod cli;

pub use engine::{Codec, DecodeOptions};
pub use error::{DecodeError, Result};
pub use rle::{Ending, Fill};
