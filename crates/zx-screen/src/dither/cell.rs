//! Dithering confined to one attribute block.

use crate::color::{DistanceMetric, Rgb};
use crate::palette::Palette;

use super::{Dither, DitherAlgorithm, DitherOptions};

/// Dither one block against its resolved ink and paper and return the
/// block bitmap, `true` meaning ink.
///
/// `pixels` is the block's own `width * height` buffer, so diffused error
/// never leaves the block. `origin` is the block's screen position, which
/// keeps ordered thresholds continuous across blocks. Ink is slot 0 of the
/// pair palette, so a pixel equally far from both colors becomes ink.
#[allow(clippy::too_many_arguments)]
pub fn dither_cell(
    pixels: &mut [Rgb],
    width: usize,
    height: usize,
    ink: [u8; 3],
    paper: [u8; 3],
    metric: DistanceMetric,
    algorithm: DitherAlgorithm,
    origin: (usize, usize),
) -> Vec<bool> {
    if ink == paper {
        pixels.fill(Rgb::from_bytes(ink));
        return vec![true; width * height];
    }

    let pair = Palette::pair(ink, paper, metric);
    let options = DitherOptions::new().origin(origin.0, origin.1);
    algorithm
        .dither(pixels, width, height, &pair, &options)
        .into_iter()
        .map(|i| i == 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: [u8; 3] = [0, 0, 0xD7];
    const PAPER: [u8; 3] = [0xD7, 0xD7, 0xD7];

    #[test]
    fn test_exact_colors_map_directly() {
        let mut pixels: Vec<Rgb> = (0..64)
            .map(|i| Rgb::from_bytes(if i % 3 == 0 { INK } else { PAPER }))
            .collect();
        let bits = dither_cell(
            &mut pixels,
            8,
            8,
            INK,
            PAPER,
            DistanceMetric::Lab,
            DitherAlgorithm::FloydSteinberg,
            (0, 0),
        );
        for (i, bit) in bits.iter().enumerate() {
            assert_eq!(*bit, i % 3 == 0, "pixel {i}");
        }
    }

    #[test]
    fn test_equidistant_pixel_goes_to_ink() {
        let black = [0, 0, 0];
        let midway = Rgb::new(0.0, 0.0, 107.5);

        let mut pixels = vec![midway; 8];
        let bits = dither_cell(
            &mut pixels,
            8,
            1,
            black,
            INK,
            DistanceMetric::WeightedRgb,
            DitherAlgorithm::None,
            (0, 0),
        );
        assert!(bits.iter().all(|&b| b));
        assert!(pixels.iter().all(|&p| p == Rgb::BLACK));

        // With diffusion only the first pixel sees no carried error.
        let mut pixels = vec![midway; 8];
        let bits = dither_cell(
            &mut pixels,
            8,
            1,
            black,
            INK,
            DistanceMetric::WeightedRgb,
            DitherAlgorithm::FloydSteinberg,
            (0, 0),
        );
        assert!(bits[0]);
    }

    #[test]
    fn test_identical_pair_is_all_ink() {
        let mut pixels = vec![Rgb::from_u8(1, 2, 3); 64];
        let bits = dither_cell(
            &mut pixels,
            8,
            8,
            INK,
            INK,
            DistanceMetric::Lab,
            DitherAlgorithm::Bayer8,
            (8, 8),
        );
        assert!(bits.iter().all(|&b| b));
        assert!(pixels.iter().all(|&p| p == Rgb::from_bytes(INK)));
    }

    #[test]
    fn test_output_only_pair_colors() {
        for algorithm in DitherAlgorithm::ALL {
            let mut pixels: Vec<Rgb> = (0..16)
                .map(|i| Rgb::from_u8(i * 16, 255 - i * 16, 90))
                .collect();
            dither_cell(
                &mut pixels,
                8,
                2,
                INK,
                PAPER,
                DistanceMetric::WeightedRgb,
                algorithm,
                (16, 6),
            );
            for p in &pixels {
                assert!(
                    *p == Rgb::from_bytes(INK) || *p == Rgb::from_bytes(PAPER),
                    "{algorithm}: {p:?}"
                );
            }
        }
    }
}
