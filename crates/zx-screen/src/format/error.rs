use thiserror::Error;

use super::descriptor::ScreenFormat;

/// Input bytes that fit no screen format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unrecognized screen: {len} bytes{}", extension_suffix(.extension))]
    Mismatch {
        len: usize,
        extension: Option<String>,
    },
    #[error("{format} screens are {expected} bytes, got {actual}")]
    WrongSize {
        format: ScreenFormat,
        expected: usize,
        actual: usize,
    },
    #[error("unknown screen format '{0}'")]
    UnknownName(String),
}

fn extension_suffix(extension: &Option<String>) -> String {
    match extension {
        Some(ext) => format!(" (extension '{ext}')"),
        None => String::new(),
    }
}

/// A malformed SCA animation header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaError {
    #[error("missing SCA signature")]
    BadSignature,
    #[error("SCA file declares zero frames")]
    ZeroFrames,
    #[error("unknown SCA payload type {0}")]
    UnknownPayloadType(u8),
    #[error("SCA file truncated: need {expected} bytes, have {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("SCA frame {index} out of range (file has {count})")]
    FrameOutOfRange { index: usize, count: usize },
    #[error("SCA frame must be {expected} bytes, got {actual}")]
    FrameSize { expected: usize, actual: usize },
    #[error("SCA payload offset {offset} overlaps the header")]
    PayloadOffset { offset: usize },
    #[error("SCA files hold at most 65535 frames, got {0}")]
    TooManyFrames(usize),
}
