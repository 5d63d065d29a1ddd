//! Transparency handling for RGBA sources.

use crate::buffer::{PixelBuffer, SourceImage};
use crate::color::Rgb;

/// Decides which source pixels are transparent. Transparent pixels are
/// replaced by the conversion's background color before anything else
/// runs.
pub trait TransparencyMask {
    fn is_transparent(&self, x: usize, y: usize, rgba: [u8; 4]) -> bool;
}

/// Pixels whose alpha is below `threshold` are transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaThreshold {
    pub threshold: u8,
}

impl Default for AlphaThreshold {
    fn default() -> Self {
        Self { threshold: 128 }
    }
}

impl TransparencyMask for AlphaThreshold {
    #[inline]
    fn is_transparent(&self, _x: usize, _y: usize, rgba: [u8; 4]) -> bool {
        rgba[3] < self.threshold
    }
}

/// Convert a source to working precision. Without a mask, alpha is
/// ignored.
pub fn flatten(image: &SourceImage, mask: Option<&dyn TransparencyMask>, background: Rgb) -> PixelBuffer {
    let (w, h) = (image.width(), image.height());
    let mut pixels = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let rgba = image.pixel(x, y);
            let transparent = mask.is_some_and(|m| m.is_transparent(x, y, rgba));
            pixels.push(if transparent {
                background
            } else {
                Rgb::from_u8(rgba[0], rgba[1], rgba[2])
            });
        }
    }
    PixelBuffer::from_pixels(w, h, pixels)
}
