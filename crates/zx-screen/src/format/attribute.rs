//! Attribute byte encoding.

use crate::palette::{UlaPlusPalette, ZxPalette};

/// A standard attribute: flash bit 7, bright bit 6, paper bits 5-3, ink
/// bits 2-0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attribute {
    pub ink: u8,
    pub paper: u8,
    pub bright: bool,
    pub flash: bool,
}

impl Attribute {
    pub fn new(ink: u8, paper: u8, bright: bool) -> Self {
        Self {
            ink: ink & 7,
            paper: paper & 7,
            bright,
            flash: false,
        }
    }

    #[inline]
    pub fn from_byte(byte: u8) -> Self {
        Self {
            ink: byte & 7,
            paper: (byte >> 3) & 7,
            bright: byte & 0x40 != 0,
            flash: byte & 0x80 != 0,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        (u8::from(self.flash) << 7) | (u8::from(self.bright) << 6) | (self.paper << 3) | self.ink
    }

    /// Displayed `(ink, paper)` colors. With flash set and `flash_phase`
    /// on, the two swap.
    #[inline]
    pub fn colors(self, palette: &ZxPalette, flash_phase: bool) -> ([u8; 3], [u8; 3]) {
        let ink = palette.color(self.ink, self.bright);
        let paper = palette.color(self.paper, self.bright);
        if self.flash && flash_phase {
            (paper, ink)
        } else {
            (ink, paper)
        }
    }
}

/// A ULA+ attribute: bits 7-6 select the CLUT in place of flash and bright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UlaPlusAttribute {
    pub clut: u8,
    pub ink: u8,
    pub paper: u8,
}

impl UlaPlusAttribute {
    #[inline]
    pub fn from_byte(byte: u8) -> Self {
        Self {
            clut: byte >> 6,
            ink: byte & 7,
            paper: (byte >> 3) & 7,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        ((self.clut & 3) << 6) | ((self.paper & 7) << 3) | (self.ink & 7)
    }

    #[inline]
    pub fn colors(self, palette: &UlaPlusPalette) -> ([u8; 3], [u8; 3]) {
        (palette.ink(self.clut, self.ink), palette.paper(self.clut, self.paper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_layout() {
        let attr = Attribute {
            ink: 2,
            paper: 5,
            bright: true,
            flash: true,
        };
        assert_eq!(attr.to_byte(), 0b1110_1010);
        assert_eq!(Attribute::from_byte(0b1110_1010), attr);
        assert_eq!(Attribute::new(7, 0, false).to_byte(), 0x07);
    }

    #[test]
    fn test_flash_swaps_only_in_phase() {
        let pal = ZxPalette::default();
        let attr = Attribute::from_byte(0x80 | (1 << 3) | 6);
        let (ink, paper) = attr.colors(&pal, false);
        assert_eq!((ink, paper), (pal.color(6, false), pal.color(1, false)));
        let (ink, paper) = attr.colors(&pal, true);
        assert_eq!((ink, paper), (pal.color(1, false), pal.color(6, false)));

        let steady = Attribute::new(6, 1, false);
        assert_eq!(steady.colors(&pal, true), (pal.color(6, false), pal.color(1, false)));
    }

    #[test]
    fn test_ulaplus_byte_layout() {
        let attr = UlaPlusAttribute {
            clut: 3,
            ink: 1,
            paper: 4,
        };
        assert_eq!(attr.to_byte(), 0b1110_0001);
        assert_eq!(UlaPlusAttribute::from_byte(0b1110_0001), attr);
    }
}
