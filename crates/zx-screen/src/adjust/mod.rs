//! Image preparation before quantization.
//!
//! A conversion runs these steps in order:
//!
//! 1. **Flatten**: RGBA source to float RGB, with transparent pixels
//!    replaced by the background color ([`TransparencyMask`]).
//! 2. **Fit**: optional crop, then bilinear scaling onto the target canvas
//!    ([`FitMode`]).
//! 3. **Adjust**: the per-pixel and neighbourhood stages configured by
//!    [`AdjustOptions`], in a fixed order.
//!
//! ```
//! use zx_screen::adjust::{adjust, AdjustOptions};
//! use zx_screen::{PixelBuffer, Rgb};
//!
//! let mut buffer = PixelBuffer::new(4, 4, Rgb::new(100.0, 100.0, 100.0));
//! adjust(&mut buffer, &AdjustOptions::new().brightness(10.0));
//! assert!(buffer.get(0, 0).r > 100.0);
//! ```

mod fit;
mod mask;
mod options;
mod pipeline;

pub use fit::{fit, CropRect, FitMode};
pub use mask::{flatten, AlphaThreshold, TransparencyMask};
pub use options::AdjustOptions;
pub use pipeline::{
    adjust, apply_gamma, balance, brightness_contrast, grayscale, levels, saturate, sharpen, smooth,
};
