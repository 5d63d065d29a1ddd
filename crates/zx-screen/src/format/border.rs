//! The 384×304 border region carried by BSC and BMC4.
//!
//! The frame is cut into 8-pixel segments. Each border byte holds two
//! segment colors: the first in bits 0-2, the second in bits 3-5. Storage
//! order is the 64 full-width lines above the bitmap, then for each of the
//! 192 bitmap lines the 4 bytes left of it followed by the 4 bytes right of
//! it, then the 48 full-width lines below.

use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::color::DistanceMetric;
use crate::output::RgbImage;
use crate::palette::ZxPalette;

pub const BORDER_SIZE: usize = 4224;
pub const FRAME_WIDTH: usize = 384;
pub const FRAME_HEIGHT: usize = 304;
/// Position of the bitmap window inside the frame.
pub const BITMAP_LEFT: usize = 64;
pub const BITMAP_TOP: usize = 64;

const SEGMENT: usize = 8;
const TOP_LINES: usize = 64;
const BOTTOM_LINES: usize = 48;
const SIDE_SEGMENTS: usize = BITMAP_LEFT / SEGMENT;
const LINE_SEGMENTS: usize = FRAME_WIDTH / SEGMENT;
/// Interior color runs shorter than this many segments are not
/// reproducible by the border timing and get merged.
const MIN_RUN: usize = 3;

/// Where the border colors come from when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderSource {
    /// Sample the border area of the fitted 384×304 frame.
    #[default]
    Image,
    /// One color (0..8) everywhere.
    Solid(u8),
}

/// A horizontal stretch of border segments: `(y, x, segment count)`.
/// Both ends of a piece touch either the frame edge or the bitmap.
fn pieces() -> impl Iterator<Item = (usize, usize, usize)> {
    let top = (0..TOP_LINES).map(|y| vec![(y, 0, LINE_SEGMENTS)]);
    let sides = (TOP_LINES..TOP_LINES + 192).map(|y| {
        vec![
            (y, 0, SIDE_SEGMENTS),
            (y, BITMAP_LEFT + 256, SIDE_SEGMENTS),
        ]
    });
    let bottom = (FRAME_HEIGHT - BOTTOM_LINES..FRAME_HEIGHT).map(|y| vec![(y, 0, LINE_SEGMENTS)]);
    top.chain(sides).chain(bottom).flatten()
}

/// The two segment colors stored in one border byte.
#[inline]
pub fn unpack_byte(byte: u8) -> (u8, u8) {
    (byte & 7, (byte >> 3) & 7)
}

#[inline]
fn pack_byte(first: u8, second: u8) -> u8 {
    (first & 7) | ((second & 7) << 3)
}

/// Recolor interior runs shorter than [`MIN_RUN`] to the color of the run
/// before them. Runs touching either end of the piece are kept.
fn merge_short_runs(segments: &mut [u8]) {
    let len = segments.len();
    let mut start = 0;
    while start < len {
        let color = segments[start];
        let mut end = start + 1;
        while end < len && segments[end] == color {
            end += 1;
        }
        let interior = start > 0 && end < len;
        if interior && end - start < MIN_RUN {
            let previous = segments[start - 1];
            segments[start..end].fill(previous);
        }
        start = end;
    }
}

/// Encode the border of a 384×304 frame against the non-bright bank.
pub fn encode_border(frame: &PixelBuffer, palette: &ZxPalette, metric: DistanceMetric) -> Vec<u8> {
    debug_assert_eq!((frame.width(), frame.height()), (FRAME_WIDTH, FRAME_HEIGHT));
    let bank = palette.bank(false, metric);
    let mut segments = Vec::with_capacity(BORDER_SIZE * 2);
    for (y, x0, count) in pieces() {
        let mut line: Vec<u8> = (0..count)
            .map(|s| {
                let mean = frame.row_mean(x0 + s * SEGMENT, y, SEGMENT);
                bank.find_nearest(mean).0 as u8
            })
            .collect();
        merge_short_runs(&mut line);
        segments.extend(line);
    }
    debug!(segments = segments.len(), "encoded border");
    segments
        .chunks_exact(2)
        .map(|pair| pack_byte(pair[0], pair[1]))
        .collect()
}

/// A border of one color.
pub fn solid_border(color: u8) -> Vec<u8> {
    vec![pack_byte(color, color); BORDER_SIZE]
}

/// Paint the border described by `bytes` onto a 384×304 image.
pub fn decode_border(bytes: &[u8], palette: &ZxPalette, image: &mut RgbImage) {
    let mut colors = bytes.iter().flat_map(|&b| {
        let (first, second) = unpack_byte(b);
        [first, second]
    });
    for (y, x0, count) in pieces() {
        for s in 0..count {
            let index = colors.next().unwrap_or(0);
            image.fill_rect(x0 + s * SEGMENT, y, SEGMENT, 1, palette.color(index, false));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_piece_count_matches_size() {
        let segments: usize = pieces().map(|(_, _, count)| count).sum();
        assert_eq!(segments, BORDER_SIZE * 2);
    }

    #[test]
    fn test_nibble_order() {
        assert_eq!(pack_byte(2, 5), 0b101_010);
        assert_eq!(unpack_byte(0b101_010), (2, 5));
    }

    #[test]
    fn test_short_interior_run_merges() {
        let mut line = vec![1, 1, 1, 4, 4, 1, 1, 1];
        merge_short_runs(&mut line);
        assert_eq!(line, vec![1; 8]);
    }

    #[test]
    fn test_edge_runs_survive() {
        let mut line = vec![4, 1, 1, 1, 1, 1, 1, 2];
        merge_short_runs(&mut line);
        assert_eq!(line, vec![4, 1, 1, 1, 1, 1, 1, 2]);

        let mut long = vec![1, 1, 3, 3, 3, 1, 1, 1];
        merge_short_runs(&mut long);
        assert_eq!(long, vec![1, 1, 3, 3, 3, 1, 1, 1]);
    }

    #[test]
    fn test_uniform_frame_encodes_uniform_bytes() {
        let palette = ZxPalette::default();
        let [r, g, b] = palette.color(2, false);
        let frame = PixelBuffer::new(FRAME_WIDTH, FRAME_HEIGHT, Rgb::from_u8(r, g, b));
        let bytes = encode_border(&frame, &palette, DistanceMetric::Lab);
        assert_eq!(bytes.len(), BORDER_SIZE);
        assert!(bytes.iter().all(|&b| unpack_byte(b) == (2, 2)));
    }

    #[test]
    fn test_decode_paints_frame_only() {
        let palette = ZxPalette::default();
        let mut image = RgbImage::new(FRAME_WIDTH, FRAME_HEIGHT);
        decode_border(&solid_border(5), &palette, &mut image);
        let cyan = palette.color(5, false);
        assert_eq!(image.get(0, 0), cyan);
        assert_eq!(image.get(383, 303), cyan);
        assert_eq!(image.get(63, 100), cyan);
        assert_eq!(image.get(320, 100), cyan);
        assert_eq!(image.get(64, 64), [0, 0, 0]);
        assert_eq!(image.get(319, 255), [0, 0, 0]);
    }
}
