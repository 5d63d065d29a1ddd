//! True-color image produced by decoding a screen.

/// An RGB8 image, row-major, three bytes per pixel.
///
/// ```
/// use zx_screen::RgbImage;
///
/// let mut image = RgbImage::new(2, 2);
/// image.put(1, 0, [0xD7, 0, 0]);
/// assert_eq!(image.get(1, 0), [0xD7, 0, 0]);
/// assert_eq!(image.data().len(), 2 * 2 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbImage {
    /// Black image.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, [0, 0, 0])
    }

    pub fn filled(width: usize, height: usize, color: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            data,
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

    /// Pixels as `[R, G, B, R, G, B, ...]`.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn put(&mut self, x: usize, y: usize, color: [u8; 3]) {
        let i = (y * self.width + x) * 3;
        self.data[i..i + 3].copy_from_slice(&color);
    }

    pub fn fill_rect(&mut self, x0: usize, y0: usize, width: usize, height: usize, color: [u8; 3]) {
        for y in y0..(y0 + height).min(self.height) {
            for x in x0..(x0 + width).min(self.width) {
                self.put(x, y, color);
            }
        }
    }

    /// Copy `other` into this image with its top-left corner at `(x0, y0)`.
    pub fn blit(&mut self, other: &RgbImage, x0: usize, y0: usize) {
        for y in 0..other.height {
            for x in 0..other.width {
                self.put(x0 + x, y0 + y, other.get(x, y));
            }
        }
    }

    /// Pixel-wise mean of two equally sized images, rounding half up.
    pub fn blend(a: &RgbImage, b: &RgbImage) -> RgbImage {
        debug_assert_eq!((a.width, a.height), (b.width, b.height));
        let data = a
            .data
            .iter()
            .zip(&b.data)
            .map(|(&x, &y)| ((x as u16 + y as u16 + 1) / 2) as u8)
            .collect();
        RgbImage {
            width: a.width,
            height: a.height,
            data,
        }
    }
}
