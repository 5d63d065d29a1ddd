//! ConversionRequest builder -- image in, screen bytes out.
//!
//! [`ConversionRequest`] chains the stages a conversion needs: transparency
//! flattening, crop and fit onto the target canvas, tone adjustment and
//! finally the [`Encoder`].

use tracing::{debug, info};

use crate::adjust::{
    adjust, fit, flatten, AdjustOptions, AlphaThreshold, CropRect, FitMode, TransparencyMask,
};
use crate::buffer::{PixelBuffer, SourceImage};
use crate::color::{DistanceMetric, Rgb};
use crate::dither::DitherAlgorithm;
use crate::encode::{DitherScope, Encoder};
use crate::format::{Attr53cPattern, BorderSource, ScreenFormat};
use crate::palette::{UlaPlusPalette, ZxPalette};

use super::ScreenError;

/// A complete image-to-screen conversion.
///
/// Configuration methods consume and return `self`;
/// [`convert()`](Self::convert) takes `&self` so the request is reusable
/// across images.
///
/// # Example
///
/// ```
/// use zx_screen::{ConversionRequest, ScreenFormat, SourceImage};
///
/// let image = SourceImage::from_fn(64, 48, |x, _| if x < 32 { [0, 0, 0] } else { [255, 255, 255] });
/// let bytes = ConversionRequest::new(ScreenFormat::Scr)
///     .unwrap()
///     .contrast(20.0)
///     .convert(&image)
///     .unwrap();
/// assert_eq!(bytes.len(), 6912);
/// ```
pub struct ConversionRequest {
    encoder: Encoder,
    fit: FitMode,
    crop: Option<CropRect>,
    adjust: AdjustOptions,
    background: Rgb,
    mask: Option<Box<dyn TransparencyMask + Send + Sync>>,
}

impl ConversionRequest {
    /// Defaults: fit with black letterboxing, no adjustment, alpha below 128
    /// is transparent.
    pub fn new(format: ScreenFormat) -> Result<Self, ScreenError> {
        Ok(Self::with_encoder(Encoder::new(format)?))
    }

    pub fn with_encoder(encoder: Encoder) -> Self {
        Self {
            encoder,
            fit: FitMode::default(),
            crop: None,
            adjust: AdjustOptions::default(),
            background: Rgb::BLACK,
            mask: Some(Box::new(AlphaThreshold::default())),
        }
    }

    #[inline]
    pub fn palette(mut self, palette: ZxPalette) -> Self {
        self.encoder = self.encoder.palette(palette);
        self
    }

    #[inline]
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.encoder = self.encoder.metric(metric);
        self
    }

    #[inline]
    pub fn dither(mut self, algorithm: DitherAlgorithm) -> Self {
        self.encoder = self.encoder.dither(algorithm);
        self
    }

    #[inline]
    pub fn scope(mut self, scope: DitherScope) -> Self {
        self.encoder = self.encoder.scope(scope);
        self
    }

    #[inline]
    pub fn pattern(mut self, pattern: Attr53cPattern) -> Self {
        self.encoder = self.encoder.pattern(pattern);
        self
    }

    #[inline]
    pub fn border(mut self, border: BorderSource) -> Self {
        self.encoder = self.encoder.border(border);
        self
    }

    #[inline]
    pub fn ulaplus_palette(mut self, palette: UlaPlusPalette) -> Self {
        self.encoder = self.encoder.ulaplus_palette(palette);
        self
    }

    #[inline]
    pub fn fit(mut self, mode: FitMode) -> Self {
        self.fit = mode;
        self
    }

    #[inline]
    pub fn crop(mut self, rect: CropRect) -> Self {
        self.crop = Some(rect);
        self
    }

    /// Replace every adjustment at once.
    #[inline]
    pub fn adjustments(mut self, options: AdjustOptions) -> Self {
        self.adjust = options;
        self
    }

    #[inline]
    pub fn brightness(mut self, amount: f32) -> Self {
        self.adjust = self.adjust.brightness(amount);
        self
    }

    #[inline]
    pub fn contrast(mut self, amount: f32) -> Self {
        self.adjust = self.adjust.contrast(amount);
        self
    }

    #[inline]
    pub fn saturation(mut self, factor: f32) -> Self {
        self.adjust = self.adjust.saturation(factor);
        self
    }

    #[inline]
    pub fn gamma(mut self, gamma: f32) -> Self {
        self.adjust = self.adjust.gamma(gamma);
        self
    }

    /// Color used for letterbox bars and transparent pixels.
    #[inline]
    pub fn background(mut self, color: Rgb) -> Self {
        self.background = color;
        self
    }

    #[inline]
    pub fn mask(mut self, mask: Box<dyn TransparencyMask + Send + Sync>) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Treat every pixel as opaque.
    #[inline]
    pub fn ignore_alpha(mut self) -> Self {
        self.mask = None;
        self
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// The canvas the encoder will see: flattened, fitted and adjusted.
    pub fn prepare(&self, image: &SourceImage) -> PixelBuffer {
        let mask = self.mask.as_deref().map(|m| m as &dyn TransparencyMask);
        let flat = flatten(image, mask, self.background);
        let (width, height) = self.encoder.canvas();
        let mut canvas = fit(&flat, self.crop, self.fit, width, height, self.background);
        debug!(
            source_width = image.width(),
            source_height = image.height(),
            width,
            height,
            mode = %self.fit,
            "fitted source onto canvas"
        );
        adjust(&mut canvas, &self.adjust);
        canvas
    }

    pub fn convert(&self, image: &SourceImage) -> Result<Vec<u8>, ScreenError> {
        let canvas = self.prepare(image);
        let bytes = self.encoder.encode(&canvas)?;
        info!(format = %self.encoder.format(), len = bytes.len(), "converted image");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{bitmap_offset, pixel_set, Attribute, BITMAP_SIZE};

    fn split_image() -> SourceImage {
        SourceImage::from_fn(512, 384, |x, _| if x < 256 { [0, 0, 0] } else { [255, 255, 255] })
    }

    #[test]
    fn test_decode_only_target_rejected() {
        assert!(matches!(
            ConversionRequest::new(ScreenFormat::Sca),
            Err(ScreenError::UnsupportedTarget(ScreenFormat::Sca))
        ));
    }

    #[test]
    fn test_prepare_scales_to_canvas() {
        let canvas = ConversionRequest::new(ScreenFormat::Scr)
            .unwrap()
            .prepare(&split_image());
        assert_eq!((canvas.width(), canvas.height()), (256, 192));
        assert_eq!(canvas.get(10, 10), Rgb::BLACK);
        assert_eq!(canvas.get(250, 10), Rgb::WHITE);
    }

    #[test]
    fn test_bordered_canvas() {
        let request = ConversionRequest::new(ScreenFormat::Bsc).unwrap();
        let canvas = request.prepare(&split_image());
        assert_eq!((canvas.width(), canvas.height()), (384, 304));

        let solid = ConversionRequest::new(ScreenFormat::Bsc)
            .unwrap()
            .border(BorderSource::Solid(2));
        assert_eq!(solid.prepare(&split_image()).width(), 256);
    }

    #[test]
    fn test_transparent_pixels_take_background() {
        let rgba: Vec<u8> = (0..256 * 192).flat_map(|_| [255, 0, 0, 0]).collect();
        let image = SourceImage::from_rgba(256, 192, rgba).unwrap();
        let request = ConversionRequest::new(ScreenFormat::Scr)
            .unwrap()
            .background(Rgb::WHITE);
        assert_eq!(request.prepare(&image).get(100, 100), Rgb::WHITE);
        let opaque = request.ignore_alpha();
        assert_eq!(opaque.prepare(&image).get(100, 100), Rgb::from_u8(255, 0, 0));
    }

    #[test]
    fn test_empty_image_converts_to_background() {
        let empty = SourceImage::from_fn(0, 0, |_, _| [255, 255, 255]);
        let request = ConversionRequest::new(ScreenFormat::Scr)
            .unwrap()
            .background(Rgb::WHITE);
        let canvas = request.prepare(&empty);
        assert_eq!((canvas.width(), canvas.height()), (256, 192));
        assert!(canvas.pixels().iter().all(|p| *p == Rgb::WHITE));

        let bytes = ConversionRequest::new(ScreenFormat::Scr)
            .unwrap()
            .convert(&empty)
            .unwrap();
        assert_eq!(bytes.len(), 6912);
        for &byte in &bytes[BITMAP_SIZE..] {
            let attr = Attribute::from_byte(byte);
            assert_eq!((attr.ink, attr.paper), (0, 0));
        }
    }

    #[test]
    fn test_convert_split_screen() {
        let bytes = ConversionRequest::new(ScreenFormat::Scr)
            .unwrap()
            .convert(&split_image())
            .unwrap();
        assert_eq!(bytes.len(), 6912);

        let palette = ZxPalette::default();
        let shown = |x: usize| {
            let attr = Attribute::from_byte(bytes[BITMAP_SIZE + x / 8]);
            let (ink, paper) = attr.colors(&palette, false);
            if pixel_set(&bytes, x, 0) { ink } else { paper }
        };
        assert_eq!(shown(0), [0, 0, 0]);
        assert_eq!(shown(255), [0xFF, 0xFF, 0xFF]);
        assert_eq!(bytes[bitmap_offset(0, 0)], bytes[bitmap_offset(0, 100)]);
    }
}
