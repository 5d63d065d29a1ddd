//! Screen bytes to true-color images.

use tracing::debug;

use crate::api::ScreenError;
use crate::format::{
    decode_border, pattern_bitmap, pixel_set, AttrGeometry, Attribute, ScaFile, ScaPayload,
    ScreenFormat, UlaPlusAttribute, BITMAP_LEFT, BITMAP_SIZE, BITMAP_TOP, BORDER_SIZE,
    FRAME_HEIGHT, FRAME_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH, SCR_SIZE,
};
use crate::output::RgbImage;
use crate::palette::{UlaPlusPalette, RGB3_COLORS};

use super::options::{Channel, DecodeOptions, GigascreenMode, Rgb3Mode};
use super::specscii;

const WHITE: [u8; 3] = [0xFF, 0xFF, 0xFF];
const BLACK: [u8; 3] = [0, 0, 0];

/// Paints over a decoded image, for example a cell grid in a preview.
pub trait ReferenceOverlay {
    fn paint(&self, image: &mut RgbImage, format: ScreenFormat);
}

/// Decodes screens of any format.
///
/// # Example
///
/// ```
/// use zx_screen::decode::{DecodeOptions, Decoder};
/// use zx_screen::ScreenFormat;
///
/// let mut scr = vec![0u8; 6912];
/// scr[6144..].fill(0x38);
/// let image = Decoder::new(DecodeOptions::new())
///     .decode(&scr, ScreenFormat::Scr)
///     .unwrap();
/// assert_eq!((image.width(), image.height()), (256, 192));
/// assert_eq!(image.get(0, 0), [0xD7, 0xD7, 0xD7]);
/// ```
pub struct Decoder {
    options: DecodeOptions,
    overlay: Option<Box<dyn ReferenceOverlay>>,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self {
            options,
            overlay: None,
        }
    }

    pub fn overlay(mut self, overlay: Box<dyn ReferenceOverlay>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Detect the format from the bytes and an optional extension, then
    /// decode.
    pub fn decode_detected(
        &self,
        bytes: &[u8],
        extension: Option<&str>,
    ) -> Result<(ScreenFormat, RgbImage), ScreenError> {
        let format = ScreenFormat::detect(bytes, extension)?;
        Ok((format, self.decode(bytes, format)?))
    }

    pub fn decode(&self, bytes: &[u8], format: ScreenFormat) -> Result<RgbImage, ScreenError> {
        format.check_size(bytes)?;
        debug!(%format, len = bytes.len(), "decoding screen");

        let descriptor = format.descriptor();
        let mut image = match format {
            ScreenFormat::Scr
            | ScreenFormat::Bsc
            | ScreenFormat::Ifl
            | ScreenFormat::Bmc4
            | ScreenFormat::Mlt => self.attr_screen(bytes, descriptor.attributes),
            ScreenFormat::ScrUlaPlus => {
                let offset = descriptor.palette_offset.unwrap_or(SCR_SIZE);
                let palette = UlaPlusPalette::from_bytes(&bytes[offset..offset + 64])?;
                ulaplus_screen(bytes, &palette)
            }
            ScreenFormat::Attr53c => {
                let mut scr = pattern_bitmap(&self.options.attr53c_pattern.bytes());
                scr.extend_from_slice(bytes);
                self.scr(&scr)
            }
            ScreenFormat::Rgb3 => rgb3_screen(bytes, self.options.rgb3),
            ScreenFormat::Gigascreen => {
                let (first, second) = bytes.split_at(SCR_SIZE);
                match self.options.gigascreen {
                    GigascreenMode::Blend => RgbImage::blend(&self.scr(first), &self.scr(second)),
                    GigascreenMode::Frame(0) => self.scr(first),
                    GigascreenMode::Frame(1) => self.scr(second),
                    GigascreenMode::Frame(n) => {
                        return Err(ScreenError::FrameOutOfRange {
                            index: n as usize,
                            count: 2,
                        })
                    }
                }
            }
            ScreenFormat::MonoFull | ScreenFormat::Mono2_3 | ScreenFormat::Mono1_3 => {
                mono_screen(bytes, descriptor.bitmap_rows)
            }
            ScreenFormat::Specscii => {
                let charset = self.options.charset.as_ref().ok_or(ScreenError::MissingCharset)?;
                self.scr(&specscii::render(bytes, charset))
            }
            ScreenFormat::Sca => self.sca_frame(bytes)?,
        };

        if let Some(offset) = descriptor.border_offset {
            let mut frame = RgbImage::new(FRAME_WIDTH, FRAME_HEIGHT);
            decode_border(&bytes[offset..offset + BORDER_SIZE], &self.options.palette, &mut frame);
            frame.blit(&image, BITMAP_LEFT, BITMAP_TOP);
            image = frame;
        }

        if let Some(overlay) = &self.overlay {
            overlay.paint(&mut image, format);
        }
        Ok(image)
    }

    fn scr(&self, bytes: &[u8]) -> RgbImage {
        self.attr_screen(bytes, ScreenFormat::Scr.descriptor().attributes)
    }

    /// Bitmap at 0 with standard attributes placed per `geometry`.
    fn attr_screen(&self, bytes: &[u8], geometry: AttrGeometry) -> RgbImage {
        let palette = &self.options.palette;
        let mut image = RgbImage::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        for y in 0..SCREEN_HEIGHT {
            for col in 0..32 {
                let attr = geometry
                    .offset(col, y)
                    .map_or_else(Attribute::default, |o| Attribute::from_byte(bytes[o]));
                let (ink, paper) = attr.colors(palette, self.options.flash_phase);
                for x in col * 8..col * 8 + 8 {
                    image.put(x, y, if pixel_set(bytes, x, y) { ink } else { paper });
                }
            }
        }
        image
    }

    fn sca_frame(&self, bytes: &[u8]) -> Result<RgbImage, ScreenError> {
        let file = ScaFile::parse(bytes)?;
        let frame = file.frame(self.options.frame)?;
        let image = match (file.payload(), file.pattern()) {
            (ScaPayload::Attributes, Some(pattern)) => {
                let mut scr = pattern_bitmap(&pattern);
                scr.extend_from_slice(frame);
                self.scr(&scr)
            }
            _ => self.scr(frame),
        };
        Ok(image)
    }
}

fn ulaplus_screen(bytes: &[u8], palette: &UlaPlusPalette) -> RgbImage {
    let mut image = RgbImage::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    for y in 0..SCREEN_HEIGHT {
        for col in 0..32 {
            let attr = UlaPlusAttribute::from_byte(bytes[BITMAP_SIZE + (y / 8) * 32 + col]);
            let (ink, paper) = attr.colors(palette);
            for x in col * 8..col * 8 + 8 {
                image.put(x, y, if pixel_set(bytes, x, y) { ink } else { paper });
            }
        }
    }
    image
}

fn rgb3_screen(bytes: &[u8], mode: Rgb3Mode) -> RgbImage {
    let (red, rest) = bytes.split_at(BITMAP_SIZE);
    let (green, blue) = rest.split_at(BITMAP_SIZE);
    let mut image = RgbImage::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    for y in 0..SCREEN_HEIGHT {
        for x in 0..SCREEN_WIDTH {
            let (r, g, b) = (
                pixel_set(red, x, y),
                pixel_set(green, x, y),
                pixel_set(blue, x, y),
            );
            let color = match mode {
                Rgb3Mode::Union => {
                    RGB3_COLORS[usize::from(b) | usize::from(r) << 1 | usize::from(g) << 2]
                }
                Rgb3Mode::Channel(Channel::Red) => if r { [0xFF, 0, 0] } else { BLACK },
                Rgb3Mode::Channel(Channel::Green) => if g { [0, 0xFF, 0] } else { BLACK },
                Rgb3Mode::Channel(Channel::Blue) => if b { [0, 0, 0xFF] } else { BLACK },
            };
            image.put(x, y, color);
        }
    }
    image
}

/// Set pixels are black ink on white paper. Rows the format does not
/// store stay white.
fn mono_screen(bytes: &[u8], rows: usize) -> RgbImage {
    let mut image = RgbImage::filled(SCREEN_WIDTH, SCREEN_HEIGHT, WHITE);
    for y in 0..rows {
        for x in 0..SCREEN_WIDTH {
            if pixel_set(bytes, x, y) {
                image.put(x, y, BLACK);
            }
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{bitmap_offset, solid_border, ScaWriter};
    use crate::palette::ZxPalette;
    use std::cell::Cell;
    use std::rc::Rc;

    fn decoder() -> Decoder {
        Decoder::new(DecodeOptions::new())
    }

    fn scr_with(attr: u8, bitmap: u8) -> Vec<u8> {
        let mut scr = vec![bitmap; SCR_SIZE];
        scr[BITMAP_SIZE..].fill(attr);
        scr
    }

    #[test]
    fn test_wrong_size_rejected() {
        let err = decoder().decode(&[0; 100], ScreenFormat::Scr).unwrap_err();
        assert!(matches!(err, ScreenError::Format(_)));
    }

    #[test]
    fn test_flash_phase_swaps() {
        let pal = ZxPalette::default();
        let scr = scr_with(0x80 | (2 << 3) | 5, 0xFF);
        let steady = decoder().decode(&scr, ScreenFormat::Scr).unwrap();
        assert_eq!(steady.get(0, 0), pal.color(5, false));
        let flashed = Decoder::new(DecodeOptions::new().flash_phase(true))
            .decode(&scr, ScreenFormat::Scr)
            .unwrap();
        assert_eq!(flashed.get(0, 0), pal.color(2, false));
    }

    #[test]
    fn test_bright_bank() {
        let scr = scr_with(0x40 | (1 << 3), 0x00);
        let image = decoder().decode(&scr, ScreenFormat::Scr).unwrap();
        assert_eq!(image.get(100, 100), [0, 0, 0xFF]);
    }

    #[test]
    fn test_mono_unstored_rows_are_white() {
        let bytes = vec![0xFF; 2048];
        let image = decoder().decode(&bytes, ScreenFormat::Mono1_3).unwrap();
        assert_eq!(image.get(10, 63), BLACK);
        assert_eq!(image.get(10, 64), WHITE);
    }

    #[test]
    fn test_rgb3_union_and_channel() {
        let mut bytes = vec![0u8; BITMAP_SIZE * 3];
        bytes[..BITMAP_SIZE].fill(0xFF);
        bytes[BITMAP_SIZE * 2..].fill(0xFF);
        let union = decoder().decode(&bytes, ScreenFormat::Rgb3).unwrap();
        assert_eq!(union.get(0, 0), [0xFF, 0, 0xFF]);

        let green = Decoder::new(DecodeOptions::new().rgb3(Rgb3Mode::Channel(Channel::Green)))
            .decode(&bytes, ScreenFormat::Rgb3)
            .unwrap();
        assert_eq!(green.get(0, 0), BLACK);
    }

    #[test]
    fn test_gigascreen_blend_and_frames() {
        let mut bytes = scr_with(0x07, 0x00);
        bytes.extend(scr_with(0x00, 0x00));
        let blend = decoder().decode(&bytes, ScreenFormat::Gigascreen).unwrap();
        assert_eq!(blend.get(0, 0), [0, 0, 0]);

        let mut bytes = scr_with(0x38, 0x00);
        bytes.extend(scr_with(0x00, 0x00));
        let blend = decoder().decode(&bytes, ScreenFormat::Gigascreen).unwrap();
        assert_eq!(blend.get(0, 0), [0x6C, 0x6C, 0x6C]);

        let second = Decoder::new(DecodeOptions::new().gigascreen(GigascreenMode::Frame(1)))
            .decode(&bytes, ScreenFormat::Gigascreen)
            .unwrap();
        assert_eq!(second.get(0, 0), BLACK);

        let err = Decoder::new(DecodeOptions::new().gigascreen(GigascreenMode::Frame(2)))
            .decode(&bytes, ScreenFormat::Gigascreen)
            .unwrap_err();
        assert!(matches!(err, ScreenError::FrameOutOfRange { index: 2, count: 2 }));
    }

    #[test]
    fn test_border_frame() {
        let pal = ZxPalette::default();
        let mut bytes = scr_with(0x38, 0x00);
        bytes.extend(solid_border(1));
        let image = decoder().decode(&bytes, ScreenFormat::Bsc).unwrap();
        assert_eq!((image.width(), image.height()), (384, 304));
        assert_eq!(image.get(0, 0), pal.color(1, false));
        assert_eq!(image.get(64, 64), pal.color(7, false));
    }

    #[test]
    fn test_53c_uses_pattern() {
        let pal = ZxPalette::default();
        let attrs = vec![(4 << 3) | 2; 768];
        let image = decoder().decode(&attrs, ScreenFormat::Attr53c).unwrap();
        // Checker: first line 0xAA, pixel 0 ink, pixel 1 paper.
        assert_eq!(image.get(0, 0), pal.color(2, false));
        assert_eq!(image.get(1, 0), pal.color(4, false));
        assert_eq!(image.get(0, 1), pal.color(4, false));
    }

    #[test]
    fn test_specscii_needs_charset() {
        let err = decoder().decode(b"HELLO", ScreenFormat::Specscii).unwrap_err();
        assert!(matches!(err, ScreenError::MissingCharset));
    }

    #[test]
    fn test_sca_frames() {
        let mut writer = ScaWriter::new();
        writer.add_frame(&scr_with(0x38, 0), 100).unwrap();
        writer.add_frame(&scr_with(0x38, 0xFF), 100).unwrap();
        let bytes = writer.finish().unwrap();

        let first = decoder().decode(&bytes, ScreenFormat::Sca).unwrap();
        assert_eq!(first.get(0, 0), [0xD7, 0xD7, 0xD7]);
        let second = Decoder::new(DecodeOptions::new().frame(1))
            .decode(&bytes, ScreenFormat::Sca)
            .unwrap();
        assert_eq!(second.get(0, 0), BLACK);
        assert!(Decoder::new(DecodeOptions::new().frame(2))
            .decode(&bytes, ScreenFormat::Sca)
            .is_err());
    }

    #[test]
    fn test_ulaplus_trailer_colors() {
        let mut bytes = scr_with(0b1100_0000, 0xFF);
        let mut trailer = [0u8; 64];
        trailer[48] = 0b000_111_00; // CLUT 3 ink 0: pure red
        bytes.extend_from_slice(&trailer);
        let image = decoder().decode(&bytes, ScreenFormat::ScrUlaPlus).unwrap();
        assert_eq!(image.get(0, 0), [0xFF, 0, 0]);
    }

    struct Marker(Rc<Cell<usize>>);

    impl ReferenceOverlay for Marker {
        fn paint(&self, image: &mut RgbImage, _format: ScreenFormat) {
            image.put(0, 0, [1, 2, 3]);
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_overlay_runs_last() {
        let calls = Rc::new(Cell::new(0));
        let image = decoder()
            .overlay(Box::new(Marker(calls.clone())))
            .decode(&scr_with(0x38, 0), ScreenFormat::Scr)
            .unwrap();
        assert_eq!(image.get(0, 0), [1, 2, 3]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_bitmap_addressing_in_decode() {
        let mut scr = scr_with(0x38, 0);
        scr[bitmap_offset(0, 8)] = 0x80;
        let image = decoder().decode(&scr, ScreenFormat::Scr).unwrap();
        assert_eq!(image.get(0, 8), BLACK);
        assert_eq!(image.get(0, 1), [0xD7, 0xD7, 0xD7]);
    }
}
