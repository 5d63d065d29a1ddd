//! Turning screen bytes back into pictures.
//!
//! [`Decoder`] handles every format in [`crate::ScreenFormat`]. Display
//! choices that have no single right answer (flash phase, Gigascreen
//! blending, RGB3 plane view, SCA frame) live in [`DecodeOptions`].

mod decoder;
mod options;
mod specscii;

pub use decoder::{Decoder, ReferenceOverlay};
pub use options::{Channel, DecodeOptions, GigascreenMode, Rgb3Mode};
pub use specscii::{render as render_specscii, CharSet};
