// Single-flag register reader sharing its cursor with raw byte reads.
//
// Formats built on this pattern load a whole control word (8, 16 or 32
// bits, little-endian) only when the previous one is used up, and pull
// literal bytes from the very same cursor in between. A flag word therefore
// sits in the stream exactly where the decoder first needs a bit after the
// previous word ran out.

use super::cursor::ByteCursor;
use crate::error::Result;

/// Width of one control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagUnit {
    U8,
    U16Le,
    U32Le,
}

impl FlagUnit {
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Self::U8 => 8,
            Self::U16Le => 16,
            Self::U32Le => 32,
        }
    }
}

/// Which end of the control word is consumed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOrder {
    /// Top bit of the word is the current flag.
    TopFirst,
    /// Bit 0 of the word is the current flag.
    LowFirst,
}

#[derive(Debug, Clone)]
pub struct FlagReader<'a> {
    cursor: ByteCursor<'a>,
    unit: FlagUnit,
    order: FlagOrder,
    reg: u32,
    left: u32,
}

impl<'a> FlagReader<'a> {
    pub fn new(cursor: ByteCursor<'a>, unit: FlagUnit, order: FlagOrder) -> Self {
        Self {
            cursor,
            unit,
            order,
            reg: 0,
            left: 0,
        }
    }

    fn reload(&mut self) -> Result<()> {
        self.reg = match self.unit {
            FlagUnit::U8 => u32::from(self.cursor.read_u8()?),
            FlagUnit::U16Le => u32::from(self.cursor.read_u16_le()?),
            FlagUnit::U32Le => self.cursor.read_u32_le()?,
        };
        self.left = self.unit.bits();
        Ok(())
    }

    /// Next control flag, loading a fresh control word if needed.
    pub fn bit(&mut self) -> Result<bool> {
        if self.left == 0 {
            self.reload()?;
        }
        self.left -= 1;
        let set = match self.order {
            FlagOrder::TopFirst => {
                let top = self.unit.bits() - 1;
                let set = (self.reg >> top) & 1 != 0;
                self.reg = (self.reg << 1) & mask(self.unit.bits());
                set
            }
            FlagOrder::LowFirst => {
                let set = self.reg & 1 != 0;
                self.reg >>= 1;
                set
            }
        };
        Ok(set)
    }

    /// `n` flags folded into an integer, first flag most significant.
    pub fn bits(&mut self, n: u32) -> Result<u32> {
        let mut value = 0;
        for _ in 0..n {
            value = (value << 1) | u32::from(self.bit()?);
        }
        Ok(value)
    }

    /// Next raw byte from the shared stream.
    #[inline]
    pub fn byte(&mut self) -> Result<u8> {
        self.cursor.read_u8()
    }

    #[inline]
    pub fn u16_le(&mut self) -> Result<u16> {
        self.cursor.read_u16_le()
    }

    pub fn cursor(&self) -> &ByteCursor<'a> {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut ByteCursor<'a> {
        &mut self.cursor
    }
}

#[inline]
fn mask(bits: u32) -> u32 {
    if bits >= 32 { u32::MAX } else { (1 << bits) - 1 }
}
