//! Image to screen encoding.
//!
//! [`Encoder`] takes a canvas that is already fitted and adjusted and
//! writes the bytes of one format. Per block it runs the color search
//! (16 colors, ULA+ CLUTs, or a fixed black and white), dithers either the
//! whole screen or each block against its own two colors ([`DitherScope`]),
//! and lays the bitmap and attributes out per the format catalog.

mod blocks;
mod encoder;

pub use blocks::DitherScope;
pub use encoder::Encoder;
