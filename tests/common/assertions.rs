//! Assertion helpers for tests.

use pretty_assertions::assert_eq;
use zx_screen::RgbImage;

/// Assert the bytes are a PNG file.
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Assert every pixel in the rectangle has `color`.
pub fn assert_region(image: &RgbImage, x0: usize, y0: usize, w: usize, h: usize, color: [u8; 3]) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            assert_eq!(image.get(x, y), color, "pixel ({x}, {y})");
        }
    }
}
