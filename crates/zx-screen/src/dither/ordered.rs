//! Ordered dithering with Bayer and clustered-dot threshold matrices.

use crate::color::Rgb;
use crate::palette::Palette;

use super::{dither_with_matrix, Dither, DitherOptions};

pub const BAYER_4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

pub const BAYER_8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Two interleaved dot screens; thresholds grow outward from each dot
/// centre so darker tones form round clumps.
pub const CLUSTERED_DOT_8: [[u8; 8]; 8] = [
    [24, 10, 12, 26, 35, 47, 49, 37],
    [8, 0, 2, 14, 45, 59, 61, 51],
    [22, 6, 4, 16, 43, 57, 63, 53],
    [30, 20, 18, 28, 33, 41, 55, 39],
    [34, 46, 48, 36, 25, 11, 13, 27],
    [44, 58, 60, 50, 9, 1, 3, 15],
    [42, 56, 62, 52, 23, 7, 5, 17],
    [32, 40, 54, 38, 31, 21, 19, 29],
];

/// 4×4 Bayer matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bayer4;

impl Dither for Bayer4 {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_matrix(pixels, width, height, palette, &BAYER_4, options)
    }
}

/// 8×8 Bayer matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bayer8;

impl Dither for Bayer8 {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_matrix(pixels, width, height, palette, &BAYER_8, options)
    }
}

/// 8×8 clustered-dot ("pattern") matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusteredDot;

impl Dither for ClusteredDot {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_matrix(pixels, width, height, palette, &CLUSTERED_DOT_8, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DistanceMetric;

    fn is_permutation<const N: usize>(m: &[[u8; N]; N]) -> bool {
        let mut seen = vec![false; N * N];
        for row in m {
            for &v in row {
                if (v as usize) >= N * N || seen[v as usize] {
                    return false;
                }
                seen[v as usize] = true;
            }
        }
        true
    }

    #[test]
    fn test_matrices_are_permutations() {
        assert!(is_permutation(&BAYER_4));
        assert!(is_permutation(&BAYER_8));
        assert!(is_permutation(&CLUSTERED_DOT_8));
    }

    #[test]
    fn test_bayer_half_grey_is_half_on() {
        // Equidistant from both colors: exactly half the thresholds fall
        // below 0.5.
        let palette =
            Palette::new(&[[0, 0, 0], [200, 200, 200]], DistanceMetric::WeightedRgb).unwrap();
        let mut pixels = vec![Rgb::from_u8(100, 100, 100); 16];
        let indices = Bayer4.dither(&mut pixels, 4, 4, &palette, &DitherOptions::new());
        assert_eq!(indices.iter().filter(|&&i| i == 0).count(), 8);
    }

    #[test]
    fn test_origin_shifts_pattern() {
        let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]], DistanceMetric::Lab).unwrap();
        let source = vec![Rgb::from_u8(90, 90, 90); 64];

        let mut whole = source.clone();
        let full = Bayer8.dither(&mut whole, 8, 8, &palette, &DitherOptions::new());

        // The right half dithered alone with its origin matches the
        // right half of the whole.
        let mut half = vec![Rgb::from_u8(90, 90, 90); 32];
        let right = Bayer8.dither(&mut half, 4, 8, &palette, &DitherOptions::new().origin(4, 0));
        for y in 0..8 {
            assert_eq!(&right[y * 4..y * 4 + 4], &full[y * 8 + 4..y * 8 + 8]);
        }
    }
}
