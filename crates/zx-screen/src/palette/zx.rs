//! The 16-color Spectrum palette and the 8-color pure RGB set.
//!
//! Color numbers follow the hardware: bit 0 is blue, bit 1 red, bit 2 green,
//! giving black, blue, red, magenta, green, cyan, yellow, white. Slot `n` of
//! a 16-entry table is `bright * 8 + color`.

use std::fmt;
use std::str::FromStr;

use super::error::PaletteError;
use super::palette::Palette;
use crate::color::{DistanceMetric, Rgb};

/// Build the 8 colors of one bank with every lit channel at `level`.
const fn bank(level: u8) -> [[u8; 3]; 8] {
    let mut out = [[0u8; 3]; 8];
    let mut i = 0;
    while i < 8 {
        let b = if i & 1 != 0 { level } else { 0 };
        let r = if i & 2 != 0 { level } else { 0 };
        let g = if i & 4 != 0 { level } else { 0 };
        out[i] = [r, g, b];
        i += 1;
    }
    out
}

const fn table(normal: u8, bright: u8) -> [[u8; 3]; 16] {
    let lo = bank(normal);
    let hi = bank(bright);
    let mut out = [[0u8; 3]; 16];
    let mut i = 0;
    while i < 8 {
        out[i] = lo[i];
        out[i + 8] = hi[i];
        i += 1;
    }
    out
}

/// The 8 pure combinations of three 1-bit planes, indexed `g << 2 | r << 1 | b`.
pub const RGB3_COLORS: [[u8; 3]; 8] = bank(0xFF);

/// Built-in 16-color tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteName {
    /// 0xD7 normal, 0xFF bright.
    #[default]
    Default,
    /// 0xCD normal, 0xFF bright; matches most emulators.
    Pulsar,
    /// 0xC0 normal, 0xFF bright.
    Linear,
}

impl PaletteName {
    pub const ALL: [PaletteName; 3] = [PaletteName::Default, PaletteName::Pulsar, PaletteName::Linear];

    fn levels(self) -> (u8, u8) {
        match self {
            PaletteName::Default => (0xD7, 0xFF),
            PaletteName::Pulsar => (0xCD, 0xFF),
            PaletteName::Linear => (0xC0, 0xFF),
        }
    }
}

impl FromStr for PaletteName {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(PaletteName::Default),
            "pulsar" => Ok(PaletteName::Pulsar),
            "linear" => Ok(PaletteName::Linear),
            other => Err(PaletteError::UnknownTable(other.to_string())),
        }
    }
}

impl fmt::Display for PaletteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaletteName::Default => "default",
            PaletteName::Pulsar => "pulsar",
            PaletteName::Linear => "linear",
        })
    }
}

/// A 16-color Spectrum table: 8 normal colors followed by 8 bright ones.
///
/// Immutable once built. Callers that want a different "current palette"
/// hold a different value and pass it along.
///
/// ```
/// use zx_screen::{PaletteName, ZxPalette};
///
/// let pal = ZxPalette::named(PaletteName::Pulsar);
/// assert_eq!(pal.color(2, false), [0xCD, 0, 0]);
/// assert_eq!(pal.color(2, true), [0xFF, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZxPalette {
    colors: [[u8; 3]; 16],
}

impl Default for ZxPalette {
    fn default() -> Self {
        Self::named(PaletteName::Default)
    }
}

impl ZxPalette {
    pub fn named(name: PaletteName) -> Self {
        let (normal, bright) = name.levels();
        Self {
            colors: table(normal, bright),
        }
    }

    pub fn from_colors(colors: [[u8; 3]; 16]) -> Self {
        Self { colors }
    }

    /// Parse a custom table from 16 hex strings, normal bank first.
    pub fn from_hex(hex: &[&str]) -> Result<Self, PaletteError> {
        if hex.len() != 16 {
            return Err(PaletteError::WrongSize {
                expected: 16,
                actual: hex.len(),
            });
        }
        let mut colors = [[0u8; 3]; 16];
        for (slot, s) in colors.iter_mut().zip(hex) {
            *slot = s.parse::<Rgb>()?.to_bytes();
        }
        Ok(Self { colors })
    }

    /// Color `index & 7` from the normal or bright bank.
    #[inline]
    pub fn color(&self, index: u8, bright: bool) -> [u8; 3] {
        self.colors[(index & 7) as usize + if bright { 8 } else { 0 }]
    }

    /// Slot `0..16` (`bright * 8 + color`).
    #[inline]
    pub fn slot(&self, slot: usize) -> [u8; 3] {
        self.colors[slot]
    }

    pub fn colors(&self) -> &[[u8; 3]; 16] {
        &self.colors
    }

    /// One bank as an 8-entry search palette.
    pub fn bank(&self, bright: bool, metric: DistanceMetric) -> Palette {
        let start = if bright { 8 } else { 0 };
        Palette::fixed(&self.colors[start..start + 8], metric)
    }

    /// All 16 slots as one search palette; index equals slot.
    pub fn search_palette(&self, metric: DistanceMetric) -> Palette {
        Palette::fixed(&self.colors, metric)
    }
}

/// The pure RGB set used by the tri-plane format.
pub fn rgb3_palette(metric: DistanceMetric) -> Palette {
    Palette::fixed(&RGB3_COLORS, metric)
}

/// Black and white, the two colors of the monochrome formats.
pub fn mono_palette(metric: DistanceMetric) -> Palette {
    Palette::pair([0, 0, 0], [0xFF, 0xFF, 0xFF], metric)
}
