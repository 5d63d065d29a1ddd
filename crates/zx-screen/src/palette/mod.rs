//! Palettes: the generic search palette used by dithering and block
//! selection, plus the three concrete Spectrum color sets.

mod error;
mod palette;
mod ulaplus;
mod zx;

pub use error::{PaletteError, ParseColorError};
pub use palette::Palette;
pub use ulaplus::{grb332_to_rgb, rgb_to_grb332, UlaPlusPalette, CLUT_COUNT, ULAPLUS_ENTRIES};
pub use zx::{mono_palette, rgb3_palette, PaletteName, ZxPalette, RGB3_COLORS};
