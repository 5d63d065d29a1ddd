//! Public API for the zx-screen crate.
//!
//! This module provides the high-level API: the [`ConversionRequest`]
//! builder, the [`ScreenError`] unified error type and [`ParseOptionError`]
//! for option names.

mod builder;
mod error;

pub use builder::ConversionRequest;
pub use error::{ParseOptionError, ScreenError};
