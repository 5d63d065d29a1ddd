//! The catalog of screen formats: sizes, attribute geometry, trailers and
//! detection.

use std::fmt;
use std::str::FromStr;

use super::error::FormatError;
use super::layout::{ATTR_SIZE, BITMAP_SIZE, SCR_SIZE};
use super::sca::SCA_SIGNATURE;
use crate::format::border::BORDER_SIZE;

/// Every supported screen format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenFormat {
    /// Standard screen: bitmap plus one attribute per 8×8 cell.
    Scr,
    /// Standard screen plus a 64-byte GRB332 palette.
    ScrUlaPlus,
    /// Attributes only; the bitmap is a fixed pattern.
    Attr53c,
    /// Standard screen plus a 384×304 border.
    Bsc,
    /// Attribute per 8×2 block.
    Ifl,
    /// Attribute per 8×4 block, in two banks, plus a border.
    Bmc4,
    /// Attribute per 8×1 block.
    Mlt,
    /// Three 1-bit planes for red, green and blue.
    Rgb3,
    /// Two standard screens shown alternately.
    Gigascreen,
    MonoFull,
    /// First 128 rows of a bitmap.
    Mono2_3,
    /// First 64 rows of a bitmap.
    Mono1_3,
    /// Text stream drawn with a character set.
    Specscii,
    /// Animation container.
    Sca,
}

/// How a format stores its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrGeometry {
    /// No attributes; the format draws with fixed colors.
    None,
    /// One attribute byte per 8-pixel-wide block of `block_height` rows,
    /// 32 per row of blocks, starting at `offset`.
    Blocks { offset: usize, block_height: usize },
    /// One character cell split into a lines 0-3 bank at `upper` and a
    /// lines 4-7 bank at `lower`, each laid out like standard attributes.
    Split { upper: usize, lower: usize },
}

impl AttrGeometry {
    pub fn block_height(self) -> Option<usize> {
        match self {
            AttrGeometry::None => None,
            AttrGeometry::Blocks { block_height, .. } => Some(block_height),
            AttrGeometry::Split { .. } => Some(4),
        }
    }

    /// Byte offset of the attribute covering column `col` (0..32) on pixel
    /// row `y`.
    #[inline]
    pub fn offset(self, col: usize, y: usize) -> Option<usize> {
        match self {
            AttrGeometry::None => None,
            AttrGeometry::Blocks {
                offset,
                block_height,
            } => Some(offset + (y / block_height) * 32 + col),
            AttrGeometry::Split { upper, lower } => {
                let base = if y % 8 < 4 { upper } else { lower };
                Some(base + (y / 8) * 32 + col)
            }
        }
    }
}

/// Static description of one format.
#[derive(Debug, Clone, Copy)]
pub struct FormatDescriptor {
    pub format: ScreenFormat,
    pub name: &'static str,
    /// Lowercase file extensions, without the dot.
    pub extensions: &'static [&'static str],
    /// Total size, or `None` for variable-length formats.
    pub size: Option<usize>,
    /// Bitmap rows stored (0 when the format has no bitmap).
    pub bitmap_rows: usize,
    pub attributes: AttrGeometry,
    /// Offset of the 4224-byte border region, if any.
    pub border_offset: Option<usize>,
    /// Offset of the ULA+ palette trailer, if any.
    pub palette_offset: Option<usize>,
}

const STANDARD_ATTRS: AttrGeometry = AttrGeometry::Blocks {
    offset: BITMAP_SIZE,
    block_height: 8,
};

static DESCRIPTORS: [FormatDescriptor; 14] = [
    FormatDescriptor {
        format: ScreenFormat::Scr,
        name: "scr",
        extensions: &["scr"],
        size: Some(SCR_SIZE),
        bitmap_rows: 192,
        attributes: STANDARD_ATTRS,
        border_offset: None,
        palette_offset: None,
    },
    FormatDescriptor {
        format: ScreenFormat::ScrUlaPlus,
        name: "ulaplus",
        extensions: &["scr"],
        size: Some(SCR_SIZE + 64),
        bitmap_rows: 192,
        attributes: STANDARD_ATTRS,
        border_offset: None,
        palette_offset: Some(SCR_SIZE),
    },
    FormatDescriptor {
        format: ScreenFormat::Attr53c,
        name: "53c",
        extensions: &["53c", "atr"],
        size: Some(ATTR_SIZE),
        bitmap_rows: 0,
        attributes: AttrGeometry::Blocks {
            offset: 0,
            block_height: 8,
        },
        border_offset: None,
        palette_offset: None,
    },
    FormatDescriptor {
        format: ScreenFormat::Bsc,
        name: "bsc",
        extensions: &["bsc"],
        size: Some(SCR_SIZE + BORDER_SIZE),
        bitmap_rows: 192,
        attributes: STANDARD_ATTRS,
        border_offset: Some(SCR_SIZE),
        palette_offset: None,
    },
    FormatDescriptor {
        format: ScreenFormat::Ifl,
        name: "ifl",
        extensions: &["ifl"],
        size: Some(BITMAP_SIZE + 96 * 32),
        bitmap_rows: 192,
        attributes: AttrGeometry::Blocks {
            offset: BITMAP_SIZE,
            block_height: 2,
        },
        border_offset: None,
        palette_offset: None,
    },
    FormatDescriptor {
        format: ScreenFormat::Bmc4,
        name: "bmc4",
        extensions: &["bmc4", "bm4"],
        size: Some(SCR_SIZE + BORDER_SIZE + ATTR_SIZE),
        bitmap_rows: 192,
        attributes: AttrGeometry::Split {
            upper: BITMAP_SIZE,
            lower: SCR_SIZE + BORDER_SIZE,
        },
        border_offset: Some(SCR_SIZE),
        palette_offset: None,
    },
    FormatDescriptor {
        format: ScreenFormat::Mlt,
        name: "mlt",
        extensions: &["mlt"],
        size: Some(BITMAP_SIZE * 2),
        bitmap_rows: 192,
        attributes: AttrGeometry::Blocks {
            offset: BITMAP_SIZE,
            block_height: 1,
        },
        border_offset: None,
        palette_offset: None,
    },
    FormatDescriptor {
        format: ScreenFormat::Rgb3,
        name: "rgb3",
        extensions: &["3", "rgb3"],
        size: Some(BITMAP_SIZE * 3),
        bitmap_rows: 192,
        attributes: AttrGeometry::None,
        border_offset: None,
        palette_offset: None,
    },
    FormatDescriptor {
        format: ScreenFormat::Gigascreen,
        name: "gigascreen",
        extensions: &["img", "gsc"],
        size: Some(SCR_SIZE * 2),
        bitmap_rows: 192,
        attributes: STANDARD_ATTRS,
        border_offset: None,
        palette_offset: None,
    },
    FormatDescriptor {
        format: ScreenFormat::MonoFull,
        name: "mono",
        extensions: &["scr", "bin"],
        size: Some(BITMAP_SIZE),
        bitmap_rows: 192,
        attributes: AttrGeometry::None,
        border_offset: None,
        palette_offset: None,
    },
    FormatDescriptor {
        format: ScreenFormat::Mono2_3,
        name: "mono-2-3",
        extensions: &["scr", "bin"],
        size: Some(4096),
        bitmap_rows: 128,
        attributes: AttrGeometry::None,
        border_offset: None,
        palette_offset: None,
    },
    FormatDescriptor {
        format: ScreenFormat::Mono1_3,
        name: "mono-1-3",
        extensions: &["scr", "bin"],
        size: Some(2048),
        bitmap_rows: 64,
        attributes: AttrGeometry::None,
        border_offset: None,
        palette_offset: None,
    },
    FormatDescriptor {
        format: ScreenFormat::Specscii,
        name: "specscii",
        extensions: &["specscii", "txt"],
        size: None,
        bitmap_rows: 192,
        attributes: STANDARD_ATTRS,
        border_offset: None,
        palette_offset: None,
    },
    FormatDescriptor {
        format: ScreenFormat::Sca,
        name: "sca",
        extensions: &["sca"],
        size: None,
        bitmap_rows: 192,
        attributes: STANDARD_ATTRS,
        border_offset: None,
        palette_offset: None,
    },
];

impl ScreenFormat {
    pub const ALL: [ScreenFormat; 14] = [
        ScreenFormat::Scr,
        ScreenFormat::ScrUlaPlus,
        ScreenFormat::Attr53c,
        ScreenFormat::Bsc,
        ScreenFormat::Ifl,
        ScreenFormat::Bmc4,
        ScreenFormat::Mlt,
        ScreenFormat::Rgb3,
        ScreenFormat::Gigascreen,
        ScreenFormat::MonoFull,
        ScreenFormat::Mono2_3,
        ScreenFormat::Mono1_3,
        ScreenFormat::Specscii,
        ScreenFormat::Sca,
    ];

    pub fn descriptor(self) -> &'static FormatDescriptor {
        // DESCRIPTORS is in the same order as ALL.
        &DESCRIPTORS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Fixed total size in bytes; `None` for SPECSCII text and SCA.
    pub fn size(self) -> Option<usize> {
        self.descriptor().size
    }

    /// Whether decoding produces the 384×304 frame with a border.
    pub fn has_border(self) -> bool {
        self.descriptor().border_offset.is_some()
    }

    /// Decoded image size.
    pub fn canvas(self) -> (usize, usize) {
        if self.has_border() {
            (384, 304)
        } else {
            (256, 192)
        }
    }

    /// SPECSCII and SCA are decode-only through [`crate::encode`]; SCA has
    /// its own writer.
    pub fn is_encodable(self) -> bool {
        !matches!(self, ScreenFormat::Specscii | ScreenFormat::Sca)
    }

    fn accepts_len(self, len: usize) -> bool {
        match self {
            ScreenFormat::Specscii => len > 0,
            ScreenFormat::Sca => len >= super::sca::SCA_HEADER_SIZE,
            other => other.size() == Some(len),
        }
    }

    /// Identify a screen from its bytes and an optional file extension.
    ///
    /// An extension that names a format accepting this length wins. Otherwise
    /// the length alone must pick exactly one fixed-size format. Failing
    /// that, the SCA signature is checked.
    ///
    /// ```
    /// use zx_screen::ScreenFormat;
    ///
    /// assert_eq!(ScreenFormat::detect(&[0u8; 6912], None).unwrap(), ScreenFormat::Scr);
    /// assert_eq!(ScreenFormat::detect(&[0u8; 768], Some("53c")).unwrap(), ScreenFormat::Attr53c);
    /// assert!(ScreenFormat::detect(&[0u8; 768], None).is_err());
    /// ```
    pub fn detect(bytes: &[u8], extension: Option<&str>) -> Result<ScreenFormat, FormatError> {
        let len = bytes.len();
        let ext = extension.map(|e| e.trim_start_matches('.').to_ascii_lowercase());

        if let Some(ext) = ext.as_deref() {
            if let Some(format) = ScreenFormat::ALL
                .into_iter()
                .find(|f| f.descriptor().extensions.contains(&ext) && f.accepts_len(len))
            {
                return Ok(format);
            }
        }

        // A screenful of SPECSCII text is as long as a 53c file.
        let mut by_len = ScreenFormat::ALL.into_iter().filter(|&f| {
            f.size() == Some(len) || (f == ScreenFormat::Specscii && len == ATTR_SIZE)
        });
        if let (Some(format), None) = (by_len.next(), by_len.next()) {
            return Ok(format);
        }

        if len >= super::sca::SCA_HEADER_SIZE && bytes.starts_with(SCA_SIGNATURE) {
            return Ok(ScreenFormat::Sca);
        }

        Err(FormatError::Mismatch {
            len,
            extension: ext,
        })
    }

    /// Check `bytes` against this format's fixed size.
    pub fn check_size(self, bytes: &[u8]) -> Result<(), FormatError> {
        match self.size() {
            Some(expected) if expected != bytes.len() => Err(FormatError::WrongSize {
                format: self,
                expected,
                actual: bytes.len(),
            }),
            _ => Ok(()),
        }
    }
}

impl FromStr for ScreenFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        let alias = match key.as_str() {
            "scr-ulaplus" | "ula+" | "ulaplus" => "ulaplus",
            "attr" | "atr" | "attr53c" => "53c",
            "giga" | "img" => "gigascreen",
            "mono-full" => "mono",
            "mono23" | "mono-2/3" => "mono-2-3",
            "mono13" | "mono-1/3" => "mono-1-3",
            "3" => "rgb3",
            other => other,
        };
        ScreenFormat::ALL
            .into_iter()
            .find(|f| f.name() == alias)
            .ok_or_else(|| FormatError::UnknownName(s.to_string()))
    }
}

impl fmt::Display for ScreenFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_descriptor_table_order() {
        for format in ScreenFormat::ALL {
            assert_eq!(format.descriptor().format, format);
        }
    }

    #[test]
    fn test_declared_sizes() {
        let sizes: Vec<(ScreenFormat, Option<usize>)> =
            ScreenFormat::ALL.iter().map(|&f| (f, f.size())).collect();
        assert_eq!(
            sizes,
            vec![
                (ScreenFormat::Scr, Some(6912)),
                (ScreenFormat::ScrUlaPlus, Some(6976)),
                (ScreenFormat::Attr53c, Some(768)),
                (ScreenFormat::Bsc, Some(11136)),
                (ScreenFormat::Ifl, Some(9216)),
                (ScreenFormat::Bmc4, Some(11904)),
                (ScreenFormat::Mlt, Some(12288)),
                (ScreenFormat::Rgb3, Some(18432)),
                (ScreenFormat::Gigascreen, Some(13824)),
                (ScreenFormat::MonoFull, Some(6144)),
                (ScreenFormat::Mono2_3, Some(4096)),
                (ScreenFormat::Mono1_3, Some(2048)),
                (ScreenFormat::Specscii, None),
                (ScreenFormat::Sca, None),
            ]
        );
    }

    #[test]
    fn test_detect_by_length() {
        for format in ScreenFormat::ALL {
            if format == ScreenFormat::Attr53c {
                continue;
            }
            if let Some(size) = format.size() {
                assert_eq!(ScreenFormat::detect(&vec![0; size], None).unwrap(), format);
            }
        }
    }

    #[test]
    fn test_detect_shared_length_needs_extension() {
        let bytes = vec![0x41u8; 768];
        assert_eq!(
            ScreenFormat::detect(&bytes, Some(".SPECSCII")).unwrap(),
            ScreenFormat::Specscii
        );
        assert_eq!(
            ScreenFormat::detect(&bytes, Some("atr")).unwrap(),
            ScreenFormat::Attr53c
        );
        assert!(matches!(
            ScreenFormat::detect(&bytes, Some("png")),
            Err(FormatError::Mismatch { len: 768, .. })
        ));
    }

    #[test]
    fn test_detect_extension_falls_back_to_length() {
        // A .scr with ULA+ trailer.
        assert_eq!(
            ScreenFormat::detect(&[0u8; 6976], Some("scr")).unwrap(),
            ScreenFormat::ScrUlaPlus
        );
        assert_eq!(
            ScreenFormat::detect(&[0u8; 6144], Some("scr")).unwrap(),
            ScreenFormat::MonoFull
        );
    }

    #[test]
    fn test_detect_sca_signature() {
        let mut bytes = b"SCA".to_vec();
        bytes.resize(100, 0);
        assert_eq!(ScreenFormat::detect(&bytes, None).unwrap(), ScreenFormat::Sca);
    }

    #[test]
    fn test_detect_unknown() {
        assert!(matches!(
            ScreenFormat::detect(&[0u8; 1000], None),
            Err(FormatError::Mismatch {
                len: 1000,
                extension: None
            })
        ));
    }

    #[test]
    fn test_attribute_offsets() {
        let scr = ScreenFormat::Scr.descriptor().attributes;
        assert_eq!(scr.offset(0, 0), Some(6144));
        assert_eq!(scr.offset(31, 191), Some(6144 + 767));

        let ifl = ScreenFormat::Ifl.descriptor().attributes;
        assert_eq!(ifl.offset(5, 3), Some(6144 + 32 + 5));

        let mlt = ScreenFormat::Mlt.descriptor().attributes;
        assert_eq!(mlt.offset(0, 191), Some(6144 + 191 * 32));

        let bmc4 = ScreenFormat::Bmc4.descriptor().attributes;
        assert_eq!(bmc4.offset(2, 8 + 3), Some(6144 + 32 + 2));
        assert_eq!(bmc4.offset(2, 8 + 4), Some(11136 + 32 + 2));
    }

    #[test]
    fn test_parse_names() {
        for format in ScreenFormat::ALL {
            assert_eq!(format.name().parse::<ScreenFormat>().unwrap(), format);
        }
        assert_eq!("ULA+".parse::<ScreenFormat>().unwrap(), ScreenFormat::ScrUlaPlus);
        assert!(matches!(
            "gif".parse::<ScreenFormat>(),
            Err(FormatError::UnknownName(_))
        ));
    }
}
