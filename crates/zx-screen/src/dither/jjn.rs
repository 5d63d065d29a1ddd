//! Jarvis-Judice-Ninke error diffusion.

use crate::color::Rgb;
use crate::palette::Palette;

use super::{dither_with_kernel, Dither, DitherOptions, JARVIS_JUDICE_NINKE};

/// Jarvis-Judice-Ninke: twelve neighbours over three rows, all of the
/// error passed on. Smoother than Floyd-Steinberg and slower.
#[derive(Debug, Clone, Copy, Default)]
pub struct JarvisJudiceNinke;

impl Dither for JarvisJudiceNinke {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_kernel(pixels, width, height, palette, &JARVIS_JUDICE_NINKE, false, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DistanceMetric;

    #[test]
    fn test_narrow_image_does_not_panic() {
        // Kernel reaches two columns either side.
        let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]], DistanceMetric::Lab).unwrap();
        let mut pixels = vec![Rgb::from_u8(90, 90, 90); 5];
        let indices = JarvisJudiceNinke.dither(&mut pixels, 1, 5, &palette, &DitherOptions::new());
        assert_eq!(indices.len(), 5);
    }
}
