//! Bitmap addressing shared by every bitmap-carrying format.
//!
//! The 256×192 bitmap is stored as three 2048-byte thirds of 64 rows. Inside
//! a third, consecutive bytes walk the 32 columns of one pixel line, then the
//! 8 character rows, and only then the 8 pixel lines of each character row.

pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 192;
pub const COLUMNS: usize = 32;
pub const BITMAP_SIZE: usize = 6144;
pub const ATTR_SIZE: usize = 768;
pub const SCR_SIZE: usize = BITMAP_SIZE + ATTR_SIZE;

/// Offset of the byte holding pixel row `y`, column byte `col` (0..32).
///
/// ```
/// use zx_screen::format::bitmap_offset;
///
/// assert_eq!(bitmap_offset(0, 1), 256);
/// assert_eq!(bitmap_offset(0, 8), 32);
/// assert_eq!(bitmap_offset(0, 64), 2048);
/// ```
#[inline]
pub fn bitmap_offset(col: usize, y: usize) -> usize {
    let third = y / 64;
    let char_row = (y % 64) / 8;
    let line = y % 8;
    third * 2048 + char_row * 32 + line * 256 + col
}

/// Mask of pixel `x` within its byte; the leftmost pixel is bit 7.
#[inline]
pub fn bit_mask(x: usize) -> u8 {
    0x80 >> (x % 8)
}

/// Whether pixel `(x, y)` is set in a bitmap starting at `bitmap[0]`.
#[inline]
pub fn pixel_set(bitmap: &[u8], x: usize, y: usize) -> bool {
    bitmap[bitmap_offset(x / 8, y)] & bit_mask(x) != 0
}

/// Pack a `width`×`height` row-major bitmap (true = set) whose top-left
/// corner is at `(x0, y0)` into `bitmap`.
pub fn write_bits(bitmap: &mut [u8], bits: &[bool], x0: usize, y0: usize, width: usize, height: usize) {
    for dy in 0..height {
        for dx in 0..width {
            let (x, y) = (x0 + dx, y0 + dy);
            let offset = bitmap_offset(x / 8, y);
            if bits[dy * width + dx] {
                bitmap[offset] |= bit_mask(x);
            } else {
                bitmap[offset] &= !bit_mask(x);
            }
        }
    }
}
