//! Color types, Lab conversion and distance metrics.
//!
//! Two spaces are in play:
//!
//! - [`Rgb`]: gamma-encoded sRGB samples at float precision (0..=255). All
//!   adjustment and error diffusion happens here.
//! - [`Lab`]: CIE L*a*b* (D65), used only for perceptual distance.
//!
//! ```
//! use zx_screen::{distance, DistanceMetric, Rgb};
//!
//! let ink = Rgb::from_u8(0, 0, 0xD7);
//! let paper = Rgb::from_u8(0xD7, 0xD7, 0xD7);
//! assert!(distance(ink, paper, DistanceMetric::Lab) > 0.0);
//! ```

mod distance;
mod lab;
mod lut;
mod rgb;

pub use distance::{distance, ColorPoint, DistanceMetric};
pub use lab::{to_lab, Lab};
pub use rgb::Rgb;
