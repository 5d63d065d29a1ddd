//! PNG reading and writing.
//!
//! Input PNGs of any color type are expanded to 8-bit RGBA for the engine.
//! Output PNGs are written as RGB8 with fast settings, then re-compressed
//! by oxipng.

use std::io::Cursor;
use std::path::Path;

use zx_screen::{RgbImage, SourceImage};

use crate::error::CliError;

pub fn read_png(path: &Path) -> Result<SourceImage, CliError> {
    let bytes = std::fs::read(path)?;
    decode_png(&bytes)
}

pub fn decode_png(bytes: &[u8]) -> Result<SourceImage, CliError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| CliError::PngDecode(e.to_string()))?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| CliError::PngDecode(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let (width, height) = (info.width as usize, info.height as usize);
    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 0xFF])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 0xFF]).collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        other => return Err(CliError::UnsupportedColor(other)),
    };
    tracing::debug!(width, height, color = ?info.color_type, "decoded PNG");
    Ok(SourceImage::from_rgba(width, height, rgba)?)
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, CliError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width() as u32, image.height() as u32);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        let mut writer = encoder
            .write_header()
            .map_err(|e| CliError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(image.data())
            .map_err(|e| CliError::PngEncode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    // Re-compress with oxipng (zopfli + adaptive filter selection)
    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes);
    Ok(optimized)
}

pub fn write_png(path: &Path, image: &RgbImage) -> Result<(), CliError> {
    std::fs::write(path, encode_png(image)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encode_raw(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn test_rgb_written_then_read() {
        let mut image = RgbImage::new(3, 2);
        image.put(0, 0, [0xD7, 0, 0]);
        image.put(2, 1, [0, 0xFF, 0xFF]);
        let source = decode_png(&encode_png(&image).unwrap()).unwrap();
        assert_eq!((source.width(), source.height()), (3, 2));
        assert_eq!(source.pixel(0, 0), [0xD7, 0, 0, 0xFF]);
        assert_eq!(source.pixel(2, 1), [0, 0xFF, 0xFF, 0xFF]);
        assert_eq!(source.pixel(1, 1), [0, 0, 0, 0xFF]);
    }

    #[test]
    fn test_grey_alpha_expanded() {
        let png = encode_raw(2, 1, png::ColorType::GrayscaleAlpha, &[10, 255, 200, 0]);
        let source = decode_png(&png).unwrap();
        assert_eq!(source.pixel(0, 0), [10, 10, 10, 255]);
        assert_eq!(source.pixel(1, 0), [200, 200, 200, 0]);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            decode_png(b"not a png"),
            Err(CliError::PngDecode(_))
        ));
    }
}
