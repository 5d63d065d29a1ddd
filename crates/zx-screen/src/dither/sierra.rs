//! Sierra family error diffusion.

use crate::color::Rgb;
use crate::palette::Palette;

use super::{dither_with_kernel, Dither, DitherOptions, SIERRA, SIERRA_LITE, SIERRA_TWO_ROW};

/// Sierra-3: ten neighbours over three rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sierra;

impl Dither for Sierra {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_kernel(pixels, width, height, palette, &SIERRA, false, options)
    }
}

/// Sierra-2: seven neighbours over two rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct SierraTwoRow;

impl Dither for SierraTwoRow {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_kernel(pixels, width, height, palette, &SIERRA_TWO_ROW, false, options)
    }
}

/// Sierra Lite: three neighbours, the cheapest of the family.
#[derive(Debug, Clone, Copy, Default)]
pub struct SierraLite;

impl Dither for SierraLite {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_kernel(pixels, width, height, palette, &SIERRA_LITE, false, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DistanceMetric;

    #[test]
    fn test_variants_agree_on_first_row_start() {
        let palette =
            Palette::new(&[[0, 0, 0], [255, 255, 255]], DistanceMetric::WeightedRgb).unwrap();
        let source = vec![Rgb::from_u8(200, 200, 200); 12];
        for d in [&Sierra as &dyn Dither, &SierraTwoRow, &SierraLite] {
            let mut pixels = source.clone();
            let indices = d.dither(&mut pixels, 4, 3, &palette, &DitherOptions::new());
            assert_eq!(indices[0], 1);
        }
    }
}
