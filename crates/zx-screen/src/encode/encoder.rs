//! Screen encoder: a prepared canvas in, format bytes out.

use tracing::debug;

use crate::api::ScreenError;
use crate::block::{BlockChoice, BlockSelector, UlaPlusSelector};
use crate::buffer::PixelBuffer;
use crate::color::{DistanceMetric, Rgb};
use crate::decode::{DecodeOptions, Decoder};
use crate::dither::{Dither, DitherAlgorithm, DitherOptions};
use crate::format::{
    encode_border, solid_border, write_bits, Attr53cPattern, AttrGeometry, Attribute,
    BorderSource, ScreenFormat, UlaPlusAttribute, BITMAP_LEFT, BITMAP_SIZE, BITMAP_TOP,
    FRAME_HEIGHT, FRAME_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH, SCR_SIZE,
};
use crate::palette::{rgb3_palette, UlaPlusPalette, ZxPalette};

use super::blocks::{mono_bits, plan_blocks, BlockPlan, DitherScope, StandardSearch, UlaPlusSearch};

/// Encodes canvases into one target format.
///
/// Configuration methods consume and return `self`; [`Encoder::encode`]
/// takes `&self` so one encoder serves many images.
///
/// # Example
///
/// ```
/// use zx_screen::{DitherAlgorithm, Encoder, PixelBuffer, Rgb, ScreenFormat};
///
/// let encoder = Encoder::new(ScreenFormat::Scr)
///     .unwrap()
///     .dither(DitherAlgorithm::Bayer4);
/// let canvas = PixelBuffer::new(256, 192, Rgb::new(90.0, 90.0, 200.0));
/// let bytes = encoder.encode(&canvas).unwrap();
/// assert_eq!(bytes.len(), 6912);
/// ```
#[derive(Debug, Clone)]
pub struct Encoder {
    format: ScreenFormat,
    palette: ZxPalette,
    metric: DistanceMetric,
    algorithm: DitherAlgorithm,
    scope: DitherScope,
    pattern: Attr53cPattern,
    border: BorderSource,
    ulaplus: Option<UlaPlusPalette>,
}

impl Encoder {
    /// Fails with [`ScreenError::UnsupportedTarget`] for the decode-only
    /// formats.
    pub fn new(format: ScreenFormat) -> Result<Self, ScreenError> {
        if !format.is_encodable() {
            return Err(ScreenError::UnsupportedTarget(format));
        }
        Ok(Self {
            format,
            palette: ZxPalette::default(),
            metric: DistanceMetric::default(),
            algorithm: DitherAlgorithm::default(),
            scope: DitherScope::default(),
            pattern: Attr53cPattern::default(),
            border: BorderSource::default(),
            ulaplus: None,
        })
    }

    #[inline]
    pub fn palette(mut self, palette: ZxPalette) -> Self {
        self.palette = palette;
        self
    }

    #[inline]
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    #[inline]
    pub fn dither(mut self, algorithm: DitherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[inline]
    pub fn scope(mut self, scope: DitherScope) -> Self {
        self.scope = scope;
        self
    }

    #[inline]
    pub fn pattern(mut self, pattern: Attr53cPattern) -> Self {
        self.pattern = pattern;
        self
    }

    #[inline]
    pub fn border(mut self, border: BorderSource) -> Self {
        self.border = border;
        self
    }

    /// Use a fixed ULA+ palette instead of deriving one from each image.
    #[inline]
    pub fn ulaplus_palette(mut self, palette: UlaPlusPalette) -> Self {
        self.ulaplus = Some(palette);
        self
    }

    pub fn format(&self) -> ScreenFormat {
        self.format
    }

    /// Size of the canvas [`Encoder::encode`] expects: the 384×304 frame
    /// when the border is sampled from the image, else 256×192.
    pub fn canvas(&self) -> (usize, usize) {
        if self.format.has_border() && self.border == BorderSource::Image {
            (FRAME_WIDTH, FRAME_HEIGHT)
        } else {
            (SCREEN_WIDTH, SCREEN_HEIGHT)
        }
    }

    pub fn encode(&self, canvas: &PixelBuffer) -> Result<Vec<u8>, ScreenError> {
        let expected = self.canvas();
        let actual = (canvas.width(), canvas.height());
        if actual != expected {
            return Err(ScreenError::CanvasSize { expected, actual });
        }
        debug!(
            format = %self.format,
            algorithm = %self.algorithm,
            metric = %self.metric,
            "encoding screen"
        );

        let screen = if expected == (FRAME_WIDTH, FRAME_HEIGHT) {
            canvas.region(BITMAP_LEFT, BITMAP_TOP, SCREEN_WIDTH, SCREEN_HEIGHT)
        } else {
            canvas.clone()
        };

        let descriptor = self.format.descriptor();
        let bytes = match self.format {
            ScreenFormat::Scr | ScreenFormat::Ifl | ScreenFormat::Mlt => {
                self.encode_attr_screen(&screen, self.format)
            }
            ScreenFormat::Bsc | ScreenFormat::Bmc4 => {
                let mut out = self.encode_attr_screen(&screen, self.format);
                let border = match self.border {
                    BorderSource::Image => encode_border(canvas, &self.palette, self.metric),
                    BorderSource::Solid(color) => solid_border(color),
                };
                if let Some(offset) = descriptor.border_offset {
                    out[offset..offset + border.len()].copy_from_slice(&border);
                }
                out
            }
            ScreenFormat::ScrUlaPlus => self.encode_ulaplus(&screen),
            ScreenFormat::Attr53c => self.encode_53c(&screen),
            ScreenFormat::Rgb3 => self.encode_rgb3(&screen),
            ScreenFormat::Gigascreen => self.encode_gigascreen(&screen)?,
            ScreenFormat::MonoFull | ScreenFormat::Mono2_3 | ScreenFormat::Mono1_3 => {
                let rows = descriptor.bitmap_rows;
                let bits = mono_bits(&screen, rows, self.algorithm, self.metric);
                let mut out = vec![0u8; self.format.size().unwrap_or(BITMAP_SIZE)];
                write_bits(&mut out, &bits, 0, 0, SCREEN_WIDTH, rows);
                out
            }
            ScreenFormat::Specscii | ScreenFormat::Sca => {
                return Err(ScreenError::UnsupportedTarget(self.format));
            }
        };

        debug_assert_eq!(Some(bytes.len()), self.format.size());
        Ok(bytes)
    }

    fn standard_search(&self) -> StandardSearch {
        StandardSearch {
            selector: BlockSelector::new(&self.palette, self.metric),
            palette: self.palette.clone(),
            metric: self.metric,
        }
    }

    /// Bitmap plus standard attributes laid out per `format`'s geometry,
    /// in a buffer of that format's full size.
    fn encode_attr_screen(&self, screen: &PixelBuffer, format: ScreenFormat) -> Vec<u8> {
        let geometry = format.descriptor().attributes;
        let block_height = geometry.block_height().unwrap_or(8);
        let plan = plan_blocks(
            screen,
            block_height,
            &self.standard_search(),
            self.algorithm,
            self.scope,
            self.metric,
        );
        let size = format.size().unwrap_or(SCR_SIZE);
        let mut out = vec![0u8; size];
        write_plan(&mut out, &plan, geometry, |c| {
            Attribute::new(c.ink, c.paper, c.bright).to_byte()
        });
        out
    }

    fn encode_ulaplus(&self, screen: &PixelBuffer) -> Vec<u8> {
        let palette = self
            .ulaplus
            .clone()
            .unwrap_or_else(|| UlaPlusPalette::generate(screen.pixels(), SCREEN_WIDTH, SCREEN_HEIGHT));
        let search = UlaPlusSearch {
            selector: UlaPlusSelector::new(&palette, self.metric),
            palette: palette.clone(),
            metric: self.metric,
        };
        let plan = plan_blocks(screen, 8, &search, self.algorithm, self.scope, self.metric);

        let geometry = self.format.descriptor().attributes;
        let mut out = vec![0u8; SCR_SIZE + palette.as_bytes().len()];
        write_plan(&mut out, &plan, geometry, |c| {
            UlaPlusAttribute {
                clut: c.clut,
                ink: c.ink,
                paper: c.paper,
            }
            .to_byte()
        });
        out[SCR_SIZE..].copy_from_slice(palette.as_bytes());
        out
    }

    fn encode_53c(&self, screen: &PixelBuffer) -> Vec<u8> {
        let selector = BlockSelector::new(&self.palette, self.metric);
        let bits = self.pattern.cell_bits();
        let mut out = Vec::with_capacity(32 * 24);
        for row in 0..24 {
            for col in 0..32 {
                let block = screen.block(col * 8, row * 8, 8, 8);
                let choice = selector.select_with_pattern(&block, &bits);
                out.push(Attribute::new(choice.ink, choice.paper, choice.bright).to_byte());
            }
        }
        debug!(pattern = %self.pattern, "encoded attribute-only screen");
        out
    }

    fn encode_rgb3(&self, screen: &PixelBuffer) -> Vec<u8> {
        let mut pixels = screen.pixels().to_vec();
        let indices = self.algorithm.dither(
            &mut pixels,
            SCREEN_WIDTH,
            SCREEN_HEIGHT,
            &rgb3_palette(self.metric),
            &DitherOptions::default(),
        );
        // Palette index bits: 0 blue, 1 red, 2 green. Planes are R, G, B.
        let mut out = vec![0u8; BITMAP_SIZE * 3];
        for (plane, bit) in [1u8, 2, 0].into_iter().enumerate() {
            let bits: Vec<bool> = indices.iter().map(|&i| i & (1 << bit) != 0).collect();
            let start = plane * BITMAP_SIZE;
            write_bits(
                &mut out[start..start + BITMAP_SIZE],
                &bits,
                0,
                0,
                SCREEN_WIDTH,
                SCREEN_HEIGHT,
            );
        }
        out
    }

    /// Frame 0 encodes the image; frame 1 encodes what the blend still
    /// needs, `2·image − frame0`, so their average approaches the source.
    fn encode_gigascreen(&self, screen: &PixelBuffer) -> Result<Vec<u8>, ScreenError> {
        let first = self.encode_attr_screen(screen, ScreenFormat::Scr);
        let shown = Decoder::new(DecodeOptions::new().palette(self.palette.clone()))
            .decode(&first, ScreenFormat::Scr)?;
        let shown = PixelBuffer::from(&shown);

        let residual: Vec<Rgb> = screen
            .pixels()
            .iter()
            .zip(shown.pixels())
            .map(|(&target, &got)| (target * 2.0 - got).clamped())
            .collect();
        let residual = PixelBuffer::from_pixels(SCREEN_WIDTH, SCREEN_HEIGHT, residual);
        let second = self.encode_attr_screen(&residual, ScreenFormat::Scr);

        let mut out = first;
        out.extend_from_slice(&second);
        Ok(out)
    }
}

/// Write a block plan's bitmap and attributes into `out`.
fn write_plan(out: &mut [u8], plan: &BlockPlan, geometry: AttrGeometry, attr: impl Fn(&BlockChoice) -> u8) {
    let height = plan.block_height;
    for row in 0..plan.rows() {
        for col in 0..32 {
            let choice = plan.choice(col, row);
            let (x, y) = (col * 8, row * height);
            write_bits(&mut out[..BITMAP_SIZE], &choice.bitmap, x, y, 8, height);
            if let Some(offset) = geometry.offset(col, y) {
                out[offset] = attr(choice);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{pixel_set, Attribute};

    fn uniform(color: [u8; 3]) -> PixelBuffer {
        PixelBuffer::new(256, 192, Rgb::from_bytes(color))
    }

    #[test]
    fn test_decode_only_formats_rejected() {
        for format in [ScreenFormat::Specscii, ScreenFormat::Sca] {
            assert!(matches!(
                Encoder::new(format),
                Err(ScreenError::UnsupportedTarget(f)) if f == format
            ));
        }
    }

    #[test]
    fn test_canvas_size_checked() {
        let encoder = Encoder::new(ScreenFormat::Bsc).unwrap();
        assert_eq!(encoder.canvas(), (384, 304));
        let err = encoder.encode(&uniform([0, 0, 0])).unwrap_err();
        assert!(matches!(err, ScreenError::CanvasSize { .. }));

        let solid = encoder.border(BorderSource::Solid(2));
        assert_eq!(solid.canvas(), (256, 192));
    }

    #[test]
    fn test_uniform_scr_attributes() {
        let palette = ZxPalette::default();
        let bytes = Encoder::new(ScreenFormat::Scr)
            .unwrap()
            .encode(&uniform(palette.color(3, true)))
            .unwrap();
        let attr = Attribute::from_byte(bytes[6144]);
        assert_eq!((attr.ink, attr.paper, attr.bright, attr.flash), (3, 3, true, false));
        assert!(bytes[6144..].iter().all(|&b| b == bytes[6144]));
    }

    #[test]
    fn test_rgb3_planes() {
        // Yellow = red + green.
        let bytes = Encoder::new(ScreenFormat::Rgb3)
            .unwrap()
            .encode(&uniform([0xFF, 0xFF, 0]))
            .unwrap();
        assert!(bytes[..6144].iter().all(|&b| b == 0xFF));
        assert!(bytes[6144..12288].iter().all(|&b| b == 0xFF));
        assert!(bytes[12288..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_mono_partial_rows() {
        let bytes = Encoder::new(ScreenFormat::Mono2_3)
            .unwrap()
            .encode(&uniform([0, 0, 0]))
            .unwrap();
        assert_eq!(bytes.len(), 4096);
        assert!(pixel_set(&bytes, 255, 127));
        assert!(bytes.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_53c_picks_pattern_colors() {
        let palette = ZxPalette::default();
        let (ink, paper) = (palette.color(2, false), palette.color(5, false));
        let pattern = Attr53cPattern::Stripe;
        let mut canvas = uniform(paper);
        for y in (0..192).step_by(2) {
            for x in 0..256 {
                canvas.set(x, y, Rgb::from_bytes(ink));
            }
        }
        let bytes = Encoder::new(ScreenFormat::Attr53c)
            .unwrap()
            .pattern(pattern)
            .encode(&canvas)
            .unwrap();
        assert_eq!(bytes.len(), 768);
        assert!(bytes.iter().all(|&b| b == Attribute::new(2, 5, false).to_byte()));
    }

    #[test]
    fn test_gigascreen_exact_image_repeats() {
        let palette = ZxPalette::default();
        let bytes = Encoder::new(ScreenFormat::Gigascreen)
            .unwrap()
            .encode(&uniform(palette.color(4, false)))
            .unwrap();
        assert_eq!(bytes.len(), 13824);
        assert_eq!(bytes[..6912], bytes[6912..]);
    }
}
