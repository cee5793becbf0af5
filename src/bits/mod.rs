// Low-level bit and byte sources shared by the decoders.
//
// There is no single universal bit reader: each format fixes register
// width, refill unit and extraction order, so each shape gets its own type.
//
// - `cursor` : ByteCursor: bounded forward byte reads
// - `msb`    : MsbBitReader: MSB-first fields of 1..=32 bits, lazy byte refill
// - `flags`  : FlagReader: one flag at a time from 8/16/32-bit control words
// - `rcr`    : CarryBitReader: backward rotate-through-carry source with CRC

pub mod cursor;
pub mod flags;
pub mod msb;
pub mod rcr;

pub use cursor::ByteCursor;
pub use flags::{FlagOrder, FlagReader, FlagUnit};
pub use msb::MsbBitReader;
pub use rcr::CarryBitReader;
