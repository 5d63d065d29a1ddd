//! Pluggable color-distance metrics.

use std::fmt;
use std::str::FromStr;

use crate::api::ParseOptionError;

use super::lab::Lab;
use super::rgb::Rgb;

/// How far apart two colors look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// "Redmean" weighted Euclidean RGB: red and blue weights follow the
    /// mean red of the pair, green is fixed at 4.
    WeightedRgb,
    /// CIE76 ΔE, Euclidean distance in Lab.
    #[default]
    Lab,
}

/// A color prepared for repeated distance queries under one metric.
///
/// Holding the Lab value next to the RGB value lets palette searches convert
/// each pixel once instead of once per candidate.
#[derive(Debug, Clone, Copy)]
pub struct ColorPoint {
    pub rgb: Rgb,
    pub lab: Lab,
}

impl ColorPoint {
    /// Prepare a float sample. The Lab value is only computed when the
    /// metric needs it.
    #[inline]
    pub fn new(rgb: Rgb, metric: DistanceMetric) -> Self {
        let lab = match metric {
            DistanceMetric::Lab => Lab::from(rgb),
            DistanceMetric::WeightedRgb => Lab::default(),
        };
        Self { rgb, lab }
    }

    /// Prepare an exact palette color, going through the Lab memo.
    #[inline]
    pub fn from_bytes(bytes: [u8; 3], metric: DistanceMetric) -> Self {
        let lab = match metric {
            DistanceMetric::Lab => Lab::of_bytes(bytes),
            DistanceMetric::WeightedRgb => Lab::default(),
        };
        Self {
            rgb: Rgb::from_bytes(bytes),
            lab,
        }
    }
}

impl DistanceMetric {
    /// Distance between two raw samples.
    pub fn distance(self, a: Rgb, b: Rgb) -> f32 {
        match self {
            DistanceMetric::WeightedRgb => weighted_rgb(a, b),
            DistanceMetric::Lab => Lab::from(a).delta_e(Lab::from(b)),
        }
    }

    /// Distance between two prepared points.
    #[inline]
    pub fn between(self, a: &ColorPoint, b: &ColorPoint) -> f32 {
        match self {
            DistanceMetric::WeightedRgb => weighted_rgb(a.rgb, b.rgb),
            DistanceMetric::Lab => a.lab.delta_e(b.lab),
        }
    }
}

#[inline]
fn weighted_rgb(a: Rgb, b: Rgb) -> f32 {
    let mean_r = (a.r + b.r) * 0.5;
    let dr = a.r - b.r;
    let dg = a.g - b.g;
    let db = a.b - b.b;
    let wr = 2.0 + mean_r / 256.0;
    let wb = 2.0 + (255.0 - mean_r) / 256.0;
    (wr * dr * dr + 4.0 * dg * dg + wb * db * db).sqrt()
}

/// Distance between two colors under `mode`.
#[inline]
pub fn distance(a: Rgb, b: Rgb, mode: DistanceMetric) -> f32 {
    mode.distance(a, b)
}

impl FromStr for DistanceMetric {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lab" | "cie76" => Ok(DistanceMetric::Lab),
            "weighted-rgb" | "weighted_rgb" | "rgb" | "redmean" => Ok(DistanceMetric::WeightedRgb),
            _ => Err(ParseOptionError::new("distance metric", s)),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::WeightedRgb => f.write_str("weighted-rgb"),
            DistanceMetric::Lab => f.write_str("lab"),
        }
    }
}
