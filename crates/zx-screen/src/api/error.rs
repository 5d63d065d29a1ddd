//! Unified error type for the public API.
//!
//! [`ScreenError`] wraps every error the crate produces so callers can use
//! `?` across palette parsing, format detection, SCA parsing and
//! conversion.

use thiserror::Error;

use crate::format::{FormatError, ScaError, ScreenFormat};
use crate::palette::{PaletteError, ParseColorError};

/// Unified error type for the zx-screen public API.
///
/// # Example
///
/// ```
/// use zx_screen::{ScreenError, ScreenFormat};
///
/// fn format_of(bytes: &[u8]) -> Result<ScreenFormat, ScreenError> {
///     Ok(ScreenFormat::detect(bytes, None)?)
/// }
///
/// assert!(format_of(&[0u8; 6912]).is_ok());
/// assert!(matches!(format_of(&[0u8; 5]), Err(ScreenError::Format(_))));
/// ```
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Sca(#[from] ScaError),

    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error("color parse error: {0}")]
    ParseColor(#[from] ParseColorError),

    /// The format can be decoded but not produced from an image.
    #[error("{0} screens cannot be encoded from an image")]
    UnsupportedTarget(ScreenFormat),

    #[error("SPECSCII text needs a character set")]
    MissingCharset,

    /// A character set is 768 bytes of glyphs or a 16K ROM.
    #[error("character set must be 768 bytes or a 16384-byte ROM, got {0} bytes")]
    InvalidCharset(usize),

    #[error("{len} bytes of pixel data do not describe a {width}x{height} image")]
    InvalidImage {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("canvas must be {}, got {}", dims(.expected), dims(.actual))]
    CanvasSize {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("frame {index} out of range ({count} frames)")]
    FrameOutOfRange { index: usize, count: usize },

    #[error(transparent)]
    ParseOption(#[from] ParseOptionError),
}

/// A name that matches none of an option's values, such as an unknown
/// dither algorithm or fit mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseOptionError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

fn dims(size: &(usize, usize)) -> String {
    format!("{}x{}", size.0, size.1)
}
