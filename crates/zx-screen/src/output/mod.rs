//! Decoded output.

mod rgb_image;

pub use rgb_image::RgbImage;
