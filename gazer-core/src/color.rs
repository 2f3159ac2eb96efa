//! Packed 16-bit color
//!
//! Every pixel exchanged with a display uses 5-6-5 RGB packing:
//! red in bits 15-11, green in bits 10-5, blue in bits 4-0. No alpha.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 5-6-5 packed RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);
    pub const RED: Self = Self(0xF800);
    pub const GREEN: Self = Self(0x07E0);
    pub const BLUE: Self = Self(0x001F);

    /// Pack 8-bit channels, dropping the low bits of each
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        Self((((r as u16) & 0xF8) << 8) | (((g as u16) & 0xFC) << 3) | ((b as u16) >> 3))
    }

    /// Raw packed value
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Red channel (0-31)
    pub const fn red(self) -> u8 {
        (self.0 >> 11) as u8
    }

    /// Green channel (0-63)
    pub const fn green(self) -> u8 {
        ((self.0 >> 5) & 0x3F) as u8
    }

    /// Blue channel (0-31)
    pub const fn blue(self) -> u8 {
        (self.0 & 0x1F) as u8
    }

    /// Bytes in wire order (high byte first)
    #[inline]
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl From<u16> for Rgb565 {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Rgb565> for u16 {
    fn from(color: Rgb565) -> Self {
        color.0
    }
}
