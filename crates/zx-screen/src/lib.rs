// LUT tables are generated; pixel loops index by coordinate.
#![allow(
    clippy::excessive_precision,
    clippy::needless_range_loop,
    clippy::module_inception,
    clippy::manual_range_contains,
    clippy::too_many_arguments
)]

//! zx-screen: ZX Spectrum screen formats
//!
//! This library converts true-color images into the attribute-block screen
//! formats of the ZX Spectrum and decodes those formats back into images.
//!
//! # Quick Start
//!
//! The [`ConversionRequest`] builder is the primary entry point for
//! encoding:
//!
//! ```
//! use zx_screen::{ConversionRequest, DitherAlgorithm, ScreenFormat, SourceImage};
//!
//! let image = SourceImage::from_fn(320, 240, |x, y| [(x % 256) as u8, (y % 256) as u8, 96]);
//! let scr = ConversionRequest::new(ScreenFormat::Scr)
//!     .unwrap()
//!     .dither(DitherAlgorithm::Atkinson)
//!     .convert(&image)
//!     .unwrap();
//! assert_eq!(scr.len(), 6912);
//! ```
//!
//! [`Decoder`] goes the other way:
//!
//! ```
//! use zx_screen::decode::{DecodeOptions, GigascreenMode};
//! use zx_screen::{Decoder, ScreenFormat};
//!
//! let bytes = vec![0u8; 13824];
//! let options = DecodeOptions::new().gigascreen(GigascreenMode::Frame(1));
//! let image = Decoder::new(options).decode(&bytes, ScreenFormat::Gigascreen).unwrap();
//! assert_eq!(image.get(0, 0), [0, 0, 0]);
//! ```
//!
//! # Screen Memory
//!
//! A standard screen is a 6144-byte bitmap followed by 768 attribute
//! bytes. Bitmap rows are interleaved: the byte for column `c` of pixel row
//! `y` lives at
//!
//! ```text
//! (y / 64) * 2048 + (y % 8) * 256 + ((y / 8) % 8) * 32 + c
//! ```
//!
//! ```
//! use zx_screen::format::bitmap_offset;
//!
//! assert_eq!(bitmap_offset(0, 1), 256);
//! assert_eq!(bitmap_offset(0, 8), 32);
//! assert_eq!(bitmap_offset(31, 191), 6143);
//! ```
//!
//! Each attribute holds a 3-bit ink, a 3-bit paper, bright and flash. All
//! pixels of one block share its two colors, so encoding is a per-block
//! choice of ink and paper followed by a 1-bit dither between them.
//! Multicolor variants ([`ScreenFormat::Ifl`], [`ScreenFormat::Mlt`],
//! [`ScreenFormat::Bmc4`]) shrink the block height; [`ScreenFormat::Rgb3`]
//! and [`ScreenFormat::Gigascreen`] mix several frames in the eye.
//!
//! # Color
//!
//! Pixels are float sRGB ([`Rgb`]). Adjustment and error diffusion run on
//! those values directly; color matching uses [`DistanceMetric`], which
//! defaults to CIE Lab.
//!
//! ```
//! use zx_screen::adjust::{adjust, AdjustOptions};
//! use zx_screen::{PixelBuffer, Rgb};
//!
//! let mut buffer = PixelBuffer::new(8, 8, Rgb::from_u8(100, 100, 100));
//! adjust(&mut buffer, &AdjustOptions::new().brightness(10.0));
//! assert!(buffer.get(0, 0).r > 100.0);
//! ```

pub mod adjust;
pub mod api;
pub mod block;
pub mod buffer;
pub mod color;
pub mod decode;
pub mod dither;
pub mod encode;
pub mod format;
pub mod output;
pub mod palette;


pub use adjust::AdjustOptions;
pub use api::{ConversionRequest, ParseOptionError, ScreenError};
pub use block::{BlockChoice, BlockSelector};
pub use buffer::{PixelBuffer, SourceImage};
pub use color::{distance, to_lab, DistanceMetric, Lab, Rgb};
pub use decode::{DecodeOptions, Decoder};
pub use dither::{dither, Dither, DitherAlgorithm, DitherOptions};
pub use encode::{DitherScope, Encoder};
pub use format::ScreenFormat;
pub use output::RgbImage;
pub use palette::{Palette, PaletteError, PaletteName, ParseColorError, UlaPlusPalette, ZxPalette};
