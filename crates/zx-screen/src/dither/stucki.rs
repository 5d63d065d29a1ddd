//! Stucki and Burkes error diffusion.

use crate::color::Rgb;
use crate::palette::Palette;

use super::{dither_with_kernel, Dither, DitherOptions, BURKES, STUCKI};

/// Stucki: the Jarvis-Judice-Ninke footprint with heavier centre weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stucki;

impl Dither for Stucki {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_kernel(pixels, width, height, palette, &STUCKI, false, options)
    }
}

/// Burkes: the first two rows of Stucki.
#[derive(Debug, Clone, Copy, Default)]
pub struct Burkes;

impl Dither for Burkes {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_kernel(pixels, width, height, palette, &BURKES, false, options)
    }
}
