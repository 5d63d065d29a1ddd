//! Floyd-Steinberg error diffusion, raster and serpentine.

use crate::color::Rgb;
use crate::palette::Palette;

use super::{dither_with_kernel, Dither, DitherOptions, FLOYD_STEINBERG};

/// Floyd-Steinberg error diffusion, every row left to right.
///
/// ```text
///        X   7
///    3   5   1
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FloydSteinberg;

impl Dither for FloydSteinberg {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_kernel(pixels, width, height, palette, &FLOYD_STEINBERG, false, options)
    }
}

/// Floyd-Steinberg with alternating scan direction: odd rows run right to
/// left with the kernel mirrored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serpentine;

impl Dither for Serpentine {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_kernel(pixels, width, height, palette, &FLOYD_STEINBERG, true, options)
    }
}
