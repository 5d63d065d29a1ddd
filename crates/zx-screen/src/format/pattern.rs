//! Fixed bitmaps for the attribute-only formats.

use std::fmt;
use std::str::FromStr;

use super::error::FormatError;
use super::layout::{bitmap_offset, BITMAP_SIZE, COLUMNS, SCREEN_HEIGHT};

/// The bitmap a 53c screen is displayed over. Every character cell
/// repeats the same 8 bytes, one per pixel line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attr53cPattern {
    /// 0xAA / 0x55 alternating lines.
    #[default]
    Checker,
    /// Full lines alternating with empty ones.
    Stripe,
    /// 0xDD / 0x77 alternating lines.
    Dd77,
}

impl Attr53cPattern {
    pub const ALL: [Attr53cPattern; 3] = [
        Attr53cPattern::Checker,
        Attr53cPattern::Stripe,
        Attr53cPattern::Dd77,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attr53cPattern::Checker => "checker",
            Attr53cPattern::Stripe => "stripe",
            Attr53cPattern::Dd77 => "dd77",
        }
    }

    pub fn bytes(self) -> [u8; 8] {
        let (even, odd) = match self {
            Attr53cPattern::Checker => (0xAA, 0x55),
            Attr53cPattern::Stripe => (0xFF, 0x00),
            Attr53cPattern::Dd77 => (0xDD, 0x77),
        };
        [even, odd, even, odd, even, odd, even, odd]
    }

    /// The 8×8 cell as row-major bits, `true` meaning ink.
    pub fn cell_bits(self) -> Vec<bool> {
        self.bytes()
            .iter()
            .flat_map(|&b| (0..8).map(move |x| b & (0x80 >> x) != 0))
            .collect()
    }
}

impl FromStr for Attr53cPattern {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "checker" | "aa55" => Ok(Attr53cPattern::Checker),
            "stripe" | "ff00" => Ok(Attr53cPattern::Stripe),
            "dd77" => Ok(Attr53cPattern::Dd77),
            _ => Err(FormatError::UnknownName(s.to_string())),
        }
    }
}

impl fmt::Display for Attr53cPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A full bitmap repeating `pattern` in every cell.
pub fn pattern_bitmap(pattern: &[u8; 8]) -> Vec<u8> {
    let mut bitmap = vec![0u8; BITMAP_SIZE];
    for y in 0..SCREEN_HEIGHT {
        for col in 0..COLUMNS {
            bitmap[bitmap_offset(col, y)] = pattern[y % 8];
        }
    }
    bitmap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checker_bits() {
        let bits = Attr53cPattern::Checker.cell_bits();
        assert_eq!(bits.len(), 64);
        assert_eq!(&bits[..8], &[true, false, true, false, true, false, true, false]);
        assert_eq!(&bits[8..16], &[false, true, false, true, false, true, false, true]);
    }

    #[test]
    fn test_dd77_bytes() {
        assert_eq!(Attr53cPattern::Dd77.bytes()[..2], [0xDD, 0x77]);
        assert_eq!("DD77".parse::<Attr53cPattern>().unwrap(), Attr53cPattern::Dd77);
    }

    #[test]
    fn test_pattern_bitmap_repeats() {
        let bitmap = pattern_bitmap(&Attr53cPattern::Stripe.bytes());
        assert_eq!(bitmap[bitmap_offset(5, 0)], 0xFF);
        assert_eq!(bitmap[bitmap_offset(5, 1)], 0x00);
        assert_eq!(bitmap[bitmap_offset(31, 190)], 0xFF);
    }
}
