//! Decode-time display choices.

use std::fmt;
use std::str::FromStr;

use crate::api::ParseOptionError;
use crate::format::Attr53cPattern;
use crate::palette::ZxPalette;

use super::specscii::CharSet;

/// How the two Gigascreen frames are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GigascreenMode {
    /// Pixel-wise average of both frames.
    #[default]
    Blend,
    /// One frame on its own, as during flicker display.
    Frame(u8),
}

impl FromStr for GigascreenMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blend" | "mix" => Ok(GigascreenMode::Blend),
            "0" => Ok(GigascreenMode::Frame(0)),
            "1" => Ok(GigascreenMode::Frame(1)),
            _ => Err(ParseOptionError::new("gigascreen mode", s)),
        }
    }
}

impl fmt::Display for GigascreenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GigascreenMode::Blend => f.write_str("blend"),
            GigascreenMode::Frame(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// How the three RGB3 planes are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rgb3Mode {
    /// All planes combined into 8 colors.
    #[default]
    Union,
    /// One plane in its own color, as during flicker display.
    Channel(Channel),
}

impl FromStr for Rgb3Mode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "union" | "rgb" => Ok(Rgb3Mode::Union),
            "r" | "red" => Ok(Rgb3Mode::Channel(Channel::Red)),
            "g" | "green" => Ok(Rgb3Mode::Channel(Channel::Green)),
            "b" | "blue" => Ok(Rgb3Mode::Channel(Channel::Blue)),
            _ => Err(ParseOptionError::new("rgb3 mode", s)),
        }
    }
}

/// Options for [`super::Decoder`].
///
/// ```
/// use zx_screen::decode::{DecodeOptions, GigascreenMode};
///
/// let options = DecodeOptions::new().flash_phase(true).gigascreen(GigascreenMode::Frame(1));
/// assert!(options.flash_phase);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub palette: ZxPalette,
    /// Second half of the flash cycle: flashing cells show swapped colors.
    pub flash_phase: bool,
    pub gigascreen: GigascreenMode,
    pub rgb3: Rgb3Mode,
    /// SCA frame index.
    pub frame: usize,
    /// Bitmap shown under 53c attributes.
    pub attr53c_pattern: Attr53cPattern,
    /// Glyphs for SPECSCII text.
    pub charset: Option<CharSet>,
}

impl DecodeOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn palette(mut self, palette: ZxPalette) -> Self {
        self.palette = palette;
        self
    }

    #[inline]
    pub fn flash_phase(mut self, phase: bool) -> Self {
        self.flash_phase = phase;
        self
    }

    #[inline]
    pub fn gigascreen(mut self, mode: GigascreenMode) -> Self {
        self.gigascreen = mode;
        self
    }

    #[inline]
    pub fn rgb3(mut self, mode: Rgb3Mode) -> Self {
        self.rgb3 = mode;
        self
    }

    #[inline]
    pub fn frame(mut self, index: usize) -> Self {
        self.frame = index;
        self
    }

    #[inline]
    pub fn attr53c_pattern(mut self, pattern: Attr53cPattern) -> Self {
        self.attr53c_pattern = pattern;
        self
    }

    #[inline]
    pub fn charset(mut self, charset: CharSet) -> Self {
        self.charset = Some(charset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("1".parse::<GigascreenMode>().unwrap(), GigascreenMode::Frame(1));
        assert_eq!("blend".parse::<GigascreenMode>().unwrap(), GigascreenMode::Blend);
        assert!("2".parse::<GigascreenMode>().is_err());
        assert_eq!("G".parse::<Rgb3Mode>().unwrap(), Rgb3Mode::Channel(Channel::Green));
    }

    #[test]
    fn test_defaults() {
        let options = DecodeOptions::default();
        assert!(!options.flash_phase);
        assert_eq!(options.frame, 0);
        assert_eq!(options.gigascreen, GigascreenMode::Blend);
        assert!(options.charset.is_none());
    }
}
