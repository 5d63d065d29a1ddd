//! Atkinson error diffusion.

use crate::color::Rgb;
use crate::palette::Palette;

use super::{dither_with_kernel, Dither, DitherOptions, ATKINSON};

/// Atkinson error diffusion.
///
/// Six neighbours get 1/8 of the error each; the remaining quarter is
/// discarded. Large flat areas come out cleaner and highlights and shadows
/// clip sooner than with Floyd-Steinberg.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Atkinson;

impl Dither for Atkinson {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_kernel(pixels, width, height, palette, &ATKINSON, false, options)
    }
}
