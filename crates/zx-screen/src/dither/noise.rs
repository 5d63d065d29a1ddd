//! Random-threshold dithering.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::Rgb;
use crate::palette::Palette;

use super::{ordered_pick, Dither, DitherOptions};

/// Uniform white-noise threshold.
///
/// The generator is seeded from [`DitherOptions::seed`] and the buffer
/// origin, so a given call is reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNoise;

impl Dither for RandomNoise {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        let (ox, oy) = options.origin;
        let seed = options.seed ^ (((oy as u64) << 32) | ox as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut output = vec![0u8; width * height];
        for (out, pixel) in output.iter_mut().zip(pixels.iter_mut()) {
            let threshold: f32 = rng.gen();
            let chosen = ordered_pick(*pixel, palette, threshold);
            *out = chosen as u8;
            *pixel = palette.rgb(chosen);
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DistanceMetric;

    fn run(seed: u64) -> Vec<u8> {
        let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]], DistanceMetric::Lab).unwrap();
        let mut pixels = vec![Rgb::from_u8(119, 119, 119); 64];
        RandomNoise.dither(&mut pixels, 8, 8, &palette, &DitherOptions::new().seed(seed))
    }

    #[test]
    fn test_same_seed_same_output() {
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn test_different_seed_different_output() {
        assert_ne!(run(1), run(2));
    }
}
