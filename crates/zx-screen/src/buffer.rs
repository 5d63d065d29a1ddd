//! Input and working pixel buffers.

use crate::api::ScreenError;
use crate::color::Rgb;
use crate::output::RgbImage;

/// A working-precision image: `width * height` float RGB samples,
/// row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, fill: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgb>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<Rgb> {
        self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) {
        self.pixels[y * self.width + x] = color;
    }

    /// Copy of the `width`×`height` rectangle at `(x0, y0)`, row-major.
    pub fn block(&self, x0: usize, y0: usize, width: usize, height: usize) -> Vec<Rgb> {
        let mut out = Vec::with_capacity(width * height);
        for y in y0..y0 + height {
            let start = y * self.width + x0;
            out.extend_from_slice(&self.pixels[start..start + width]);
        }
        out
    }

    pub fn region(&self, x0: usize, y0: usize, width: usize, height: usize) -> PixelBuffer {
        PixelBuffer::from_pixels(width, height, self.block(x0, y0, width, height))
    }

    /// Average of the `count` pixels starting at `(x, y)` on one row.
    pub fn row_mean(&self, x: usize, y: usize, count: usize) -> Rgb {
        let start = y * self.width + x;
        let sum = self.pixels[start..start + count]
            .iter()
            .fold(Rgb::BLACK, |acc, &p| acc + p);
        sum * (1.0 / count as f32)
    }
}

impl From<&RgbImage> for PixelBuffer {
    fn from(image: &RgbImage) -> Self {
        let pixels = image
            .data()
            .chunks_exact(3)
            .map(|c| Rgb::from_u8(c[0], c[1], c[2]))
            .collect();
        PixelBuffer::from_pixels(image.width(), image.height(), pixels)
    }
}

/// A decoded source raster in RGBA8, as supplied by the caller's image
/// decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl SourceImage {
    pub fn from_rgba(width: usize, height: usize, rgba: Vec<u8>) -> Result<Self, ScreenError> {
        if width == 0 || height == 0 || rgba.len() != width * height * 4 {
            return Err(ScreenError::InvalidImage {
                width,
                height,
                len: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Opaque image from packed RGB8.
    pub fn from_rgb(width: usize, height: usize, rgb: &[u8]) -> Result<Self, ScreenError> {
        if rgb.len() != width * height * 3 {
            return Err(ScreenError::InvalidImage {
                width,
                height,
                len: rgb.len(),
            });
        }
        let rgba = rgb
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 0xFF])
            .collect();
        Self::from_rgba(width, height, rgba)
    }

    /// Opaque image built pixel by pixel. A zero width or height gives an
    /// empty image, which converts to a background-only screen.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> [u8; 3]) -> Self {
        let mut rgba = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                let [r, g, b] = f(x, y);
                rgba.extend_from_slice(&[r, g, b, 0xFF]);
            }
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_copy() {
        let pixels = (0..16).map(|i| Rgb::new(i as f32, 0.0, 0.0)).collect();
        let buf = PixelBuffer::from_pixels(4, 4, pixels);
        let block = buf.block(1, 2, 2, 2);
        let reds: Vec<f32> = block.iter().map(|p| p.r).collect();
        assert_eq!(reds, vec![9.0, 10.0, 13.0, 14.0]);
    }

    #[test]
    fn test_row_mean() {
        let pixels = vec![
            Rgb::new(0.0, 0.0, 0.0),
            Rgb::new(10.0, 20.0, 30.0),
            Rgb::new(20.0, 40.0, 60.0),
        ];
        let buf = PixelBuffer::from_pixels(3, 1, pixels);
        assert_eq!(buf.row_mean(1, 0, 2), Rgb::new(15.0, 30.0, 45.0));
    }

    #[test]
    fn test_source_image_validation() {
        assert!(SourceImage::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            SourceImage::from_rgba(2, 2, vec![0; 15]),
            Err(ScreenError::InvalidImage { len: 15, .. })
        ));
        assert!(SourceImage::from_rgba(0, 0, Vec::new()).is_err());
    }

    #[test]
    fn test_from_rgb_is_opaque() {
        let img = SourceImage::from_rgb(1, 2, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(img.pixel(0, 1), [4, 5, 6, 255]);
    }
}
