use std::path::PathBuf;

use thiserror::Error;
use zx_screen::ScreenError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid {name} '{value}': {reason}")]
    InvalidOption {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot tell the screen format of {path} ({len} bytes); pass --format")]
    UnknownFormat { path: PathBuf, len: usize },

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("unsupported PNG color type {0:?}")]
    UnsupportedColor(png::ColorType),

    #[error(transparent)]
    Screen(#[from] ScreenError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn invalid(name: &'static str, value: &str, reason: impl ToString) -> Self {
        CliError::InvalidOption {
            name,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
