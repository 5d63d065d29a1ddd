//! SPECSCII: a stream of printable characters and Spectrum control codes
//! drawn onto a standard screen.

use tracing::debug;

use crate::api::ScreenError;
use crate::format::{bitmap_offset, Attribute, BITMAP_SIZE, COLUMNS, SCR_SIZE};

const GLYPHS: usize = 96;
const CHARSET_SIZE: usize = GLYPHS * 8;
const ROM_SIZE: usize = 16384;
/// Offset of the character set inside the 48K ROM.
const ROM_CHARSET: usize = 0x3D00;
const TEXT_ROWS: usize = 24;

const ENTER: u8 = 13;
const COMMA: u8 = 6;
const INK: u8 = 16;
const PAPER: u8 = 17;
const FLASH: u8 = 18;
const BRIGHT: u8 = 19;
const INVERSE: u8 = 20;
const OVER: u8 = 21;
const AT: u8 = 22;
const TAB: u8 = 23;

/// Glyphs for characters 32..128, 8 bytes each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharSet {
    glyphs: Vec<u8>,
}

impl CharSet {
    /// Accepts the 768-byte glyph table or a 16K ROM image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScreenError> {
        let glyphs = match bytes.len() {
            CHARSET_SIZE => bytes.to_vec(),
            ROM_SIZE => bytes[ROM_CHARSET..ROM_CHARSET + CHARSET_SIZE].to_vec(),
            other => return Err(ScreenError::InvalidCharset(other)),
        };
        Ok(Self { glyphs })
    }

    /// Glyph of a printable code (32..128).
    #[inline]
    pub fn glyph(&self, code: u8) -> &[u8] {
        let start = (code as usize - 32) * 8;
        &self.glyphs[start..start + 8]
    }
}

/// The eight lines of a block-graphics character. Bits 0..4 light the top
/// right, top left, bottom right and bottom left quadrants.
fn block_graphic(code: u8) -> [u8; 8] {
    let q = code & 0x0F;
    let half = |left: bool, right: bool| (if left { 0xF0 } else { 0 }) | (if right { 0x0F } else { 0 });
    let top = half(q & 0b0010 != 0, q & 0b0001 != 0);
    let bottom = half(q & 0b1000 != 0, q & 0b0100 != 0);
    [top, top, top, top, bottom, bottom, bottom, bottom]
}

struct Printer {
    screen: Vec<u8>,
    x: usize,
    y: usize,
    attr: Attribute,
    inverse: bool,
    over: bool,
}

impl Printer {
    fn new() -> Self {
        let mut screen = vec![0u8; SCR_SIZE];
        screen[BITMAP_SIZE..].fill(Attribute::new(0, 7, false).to_byte());
        Self {
            screen,
            x: 0,
            y: 0,
            attr: Attribute::new(0, 7, false),
            inverse: false,
            over: false,
        }
    }

    fn full(&self) -> bool {
        self.y >= TEXT_ROWS
    }

    fn newline(&mut self) {
        self.x = 0;
        self.y += 1;
    }

    fn put(&mut self, lines: &[u8]) {
        if self.full() {
            return;
        }
        for (line, &bits) in lines.iter().enumerate() {
            let bits = if self.inverse { !bits } else { bits };
            let offset = bitmap_offset(self.x, self.y * 8 + line);
            if self.over {
                self.screen[offset] ^= bits;
            } else {
                self.screen[offset] = bits;
            }
        }

        let at = BITMAP_SIZE + self.y * COLUMNS + self.x;
        self.screen[at] = if self.over {
            // Paper stays as it was.
            let old = Attribute::from_byte(self.screen[at]);
            Attribute { ink: self.attr.ink, ..old }.to_byte()
        } else {
            self.attr.to_byte()
        };

        self.x += 1;
        if self.x == COLUMNS {
            self.newline();
        }
    }
}

/// Draw `text` with `charset` and return the resulting 6912-byte screen.
pub fn render(text: &[u8], charset: &CharSet) -> Vec<u8> {
    let mut p = Printer::new();
    let mut bytes = text.iter().copied();

    while let Some(code) = bytes.next() {
        if p.full() {
            break;
        }
        match code {
            ENTER => p.newline(),
            COMMA => {
                if p.x < COLUMNS / 2 {
                    p.x = COLUMNS / 2;
                } else {
                    p.newline();
                }
            }
            INK..=OVER => {
                let Some(value) = bytes.next() else { break };
                match code {
                    INK if value < 8 => p.attr.ink = value,
                    PAPER if value < 8 => p.attr.paper = value,
                    FLASH if value < 2 => p.attr.flash = value == 1,
                    BRIGHT if value < 2 => p.attr.bright = value == 1,
                    INVERSE if value < 2 => p.inverse = value == 1,
                    OVER if value < 2 => p.over = value == 1,
                    _ => {}
                }
            }
            AT => {
                let (Some(row), Some(col)) = (bytes.next(), bytes.next()) else { break };
                if (row as usize) < TEXT_ROWS && (col as usize) < COLUMNS {
                    p.y = row as usize;
                    p.x = col as usize;
                }
            }
            TAB => {
                let (Some(lo), Some(hi)) = (bytes.next(), bytes.next()) else { break };
                let col = ((lo as usize) | ((hi as usize) << 8)) % COLUMNS;
                if col < p.x {
                    p.newline();
                }
                p.x = col;
            }
            0x20..=0x7F => {
                let glyph: [u8; 8] = charset.glyph(code).try_into().unwrap_or([0; 8]);
                p.put(&glyph);
            }
            0x80..=0x8F => p.put(&block_graphic(code)),
            _ => {}
        }
    }

    debug!(rows = p.y.min(TEXT_ROWS), "rendered SPECSCII text");
    p.screen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::pixel_set;

    /// Every glyph is a solid top line; 'A' (65) is a full cell.
    fn charset() -> CharSet {
        let mut glyphs = vec![0u8; CHARSET_SIZE];
        for g in 0..GLYPHS {
            glyphs[g * 8] = 0xFF;
        }
        glyphs[(65 - 32) * 8..(66 - 32) * 8].fill(0xFF);
        CharSet::from_bytes(&glyphs).unwrap()
    }

    fn attr(screen: &[u8], col: usize, row: usize) -> Attribute {
        Attribute::from_byte(screen[BITMAP_SIZE + row * 32 + col])
    }

    #[test]
    fn test_charset_sizes() {
        let mut rom = vec![0u8; ROM_SIZE];
        rom[ROM_CHARSET + 8] = 0x42;
        let cs = CharSet::from_bytes(&rom).unwrap();
        assert_eq!(cs.glyph(33)[0], 0x42);
        assert!(matches!(
            CharSet::from_bytes(&[0; 100]),
            Err(ScreenError::InvalidCharset(100))
        ));
    }

    #[test]
    fn test_default_colors() {
        let screen = render(b"", &charset());
        assert!(screen[BITMAP_SIZE..].iter().all(|&b| b == 0x38));
    }

    #[test]
    fn test_text_wraps_and_newline() {
        let cs = charset();
        let screen = render(b"A\rA", &cs);
        assert!(pixel_set(&screen, 0, 7));
        assert!(pixel_set(&screen, 0, 15));
        assert!(!pixel_set(&screen, 8, 7));
    }

    #[test]
    fn test_ink_paper_and_at() {
        let text = [INK, 2, PAPER, 6, BRIGHT, 1, AT, 3, 10, b'A'];
        let screen = render(&text, &charset());
        let a = attr(&screen, 10, 3);
        assert_eq!((a.ink, a.paper, a.bright), (2, 6, true));
        assert!(pixel_set(&screen, 80, 24));
        assert_eq!(attr(&screen, 0, 0), Attribute::new(0, 7, false));
    }

    #[test]
    fn test_out_of_range_values_ignored() {
        let text = [INK, 9, b'B'];
        let screen = render(&text, &charset());
        assert_eq!(attr(&screen, 0, 0).ink, 0);
    }

    #[test]
    fn test_inverse_and_over() {
        let cs = charset();
        let screen = render(&[INVERSE, 1, b'B'], &cs);
        assert!(!pixel_set(&screen, 0, 0));
        assert!(pixel_set(&screen, 0, 1));

        // 'A' then the same cell again with OVER: full cell XOR full cell.
        let screen = render(&[b'A', AT, 0, 0, OVER, 1, b'A'], &cs);
        assert!((0..8).all(|y| !pixel_set(&screen, 3, y)));
    }

    #[test]
    fn test_block_graphics() {
        let screen = render(&[0x80 | 0b0110], &charset());
        // top-left and bottom-right
        assert!(pixel_set(&screen, 0, 0));
        assert!(!pixel_set(&screen, 4, 0));
        assert!(!pixel_set(&screen, 0, 4));
        assert!(pixel_set(&screen, 7, 7));
    }

    #[test]
    fn test_comma_and_tab() {
        let screen = render(&[COMMA, b'A', TAB, 5, 0, b'A'], &charset());
        assert!(pixel_set(&screen, 16 * 8, 3));
        // Column 5 is behind the cursor, so TAB moves to the next line.
        assert!(pixel_set(&screen, 5 * 8, 8 + 3));
    }

    #[test]
    fn test_text_beyond_screen_ignored() {
        let mut text = vec![ENTER; 30];
        text.push(b'A');
        let screen = render(&text, &charset());
        assert_eq!(screen.len(), SCR_SIZE);
        assert!(screen[..BITMAP_SIZE].iter().all(|&b| b == 0));
    }
}
