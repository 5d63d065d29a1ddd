//! scrconv - ZX Spectrum screen converter
//!
//! Command-line front-end for the `zx-screen` engine: PNG in, screen bytes
//! out, and back. This library exposes modules for integration testing.

pub mod commands;
pub mod config;
pub mod error;
pub mod image_io;
