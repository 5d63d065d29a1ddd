//! Error types for color parsing and palette construction.

use std::num::ParseIntError;

use thiserror::Error;

/// Error parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string must be 3 or 6 digits after stripping '#'.
    #[error("invalid hex color length {0} (expected 3 or 6 digits)")]
    InvalidLength(usize),
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}

/// Error building a palette.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    #[error("palette cannot be empty")]
    EmptyPalette,
    #[error("unknown palette table '{0}'")]
    UnknownTable(String),
    #[error("palette needs {expected} colors, got {actual}")]
    WrongSize { expected: usize, actual: usize },
    #[error("invalid color: {0}")]
    ParseColor(#[from] ParseColorError),
}
