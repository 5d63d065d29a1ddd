//! Blue noise ordered dithering.
//!
//! Same two-nearest-colors blend as the Bayer matrices, but the 16×16
//! threshold tile was generated with void-and-cluster so it has no low
//! frequency structure. The result looks like grain instead of a grid.

use crate::color::Rgb;
use crate::palette::Palette;

use super::{dither_with_matrix, Dither, DitherOptions};

pub const BLUE_NOISE_16: [[u8; 16]; 16] = [
    [234, 50, 188, 19, 58, 171, 121, 47, 163, 3, 247, 104, 22, 132, 14, 65],
    [209, 8, 118, 97, 240, 205, 23, 228, 138, 64, 123, 170, 72, 224, 99, 149],
    [85, 139, 229, 165, 78, 146, 111, 84, 176, 216, 30, 231, 153, 201, 42, 180],
    [25, 62, 195, 29, 43, 185, 7, 249, 41, 100, 191, 48, 87, 5, 128, 243],
    [221, 152, 101, 253, 130, 220, 59, 200, 156, 12, 136, 112, 254, 174, 69, 109],
    [46, 189, 2, 73, 172, 90, 142, 116, 80, 237, 210, 61, 147, 33, 206, 160],
    [81, 124, 217, 113, 208, 15, 241, 27, 168, 45, 178, 20, 193, 96, 225, 18],
    [242, 164, 60, 35, 157, 53, 181, 68, 223, 105, 125, 83, 236, 131, 55, 141],
    [197, 10, 227, 134, 246, 95, 126, 198, 148, 1, 244, 161, 71, 9, 182, 106],
    [40, 93, 179, 75, 192, 6, 218, 36, 91, 57, 202, 34, 215, 155, 233, 74],
    [252, 120, 150, 24, 110, 63, 166, 119, 232, 183, 133, 103, 49, 117, 31, 167],
    [16, 212, 51, 238, 207, 137, 255, 21, 76, 151, 13, 250, 190, 88, 203, 135],
    [102, 184, 82, 169, 38, 89, 187, 52, 204, 98, 173, 67, 129, 4, 222, 56],
    [230, 144, 0, 127, 226, 11, 154, 114, 239, 39, 219, 28, 235, 145, 175, 77],
    [196, 37, 248, 70, 107, 199, 66, 177, 17, 143, 115, 159, 86, 44, 108, 26],
    [122, 92, 158, 214, 140, 32, 245, 94, 213, 79, 194, 54, 211, 186, 251, 162],
];

/// Blue noise ordered dithering over a 16×16 tile.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlueNoise;

impl Dither for BlueNoise {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        dither_with_matrix(pixels, width, height, palette, &BLUE_NOISE_16, options)
    }
}
