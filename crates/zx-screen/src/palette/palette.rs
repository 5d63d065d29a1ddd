//! Search palette: an ordered list of color slots with nearest-color lookup.

use super::error::PaletteError;
use crate::color::{ColorPoint, DistanceMetric, Rgb};

/// An ordered set of colors that dithering and nearest-color matching can
/// quantize to.
///
/// Every slot is precomputed once as a [`ColorPoint`] for the configured
/// metric, so per-pixel matching only converts the pixel. Duplicate slots are
/// allowed: the 16-color Spectrum set has black in both banks.
///
/// ```
/// use zx_screen::{DistanceMetric, Palette, Rgb};
///
/// let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]], DistanceMetric::Lab).unwrap();
/// let (idx, _) = palette.find_nearest(Rgb::from_u8(40, 40, 40));
/// assert_eq!(idx, 0);
/// ```
#[derive(Debug, Clone)]
pub struct Palette {
    points: Vec<ColorPoint>,
    bytes: Vec<[u8; 3]>,
    metric: DistanceMetric,
}

impl Palette {
    pub fn new(colors: &[[u8; 3]], metric: DistanceMetric) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        Ok(Self::fixed(colors, metric))
    }

    /// Build from a table that is non-empty by construction.
    pub(crate) fn fixed(colors: &[[u8; 3]], metric: DistanceMetric) -> Self {
        debug_assert!(!colors.is_empty());
        Self {
            points: colors
                .iter()
                .map(|&c| ColorPoint::from_bytes(c, metric))
                .collect(),
            bytes: colors.to_vec(),
            metric,
        }
    }

    /// Two-color palette used by cell-local dithering: slot 0 is ink, slot 1
    /// is paper.
    pub fn pair(ink: [u8; 3], paper: [u8; 3], metric: DistanceMetric) -> Self {
        Self {
            points: vec![
                ColorPoint::from_bytes(ink, metric),
                ColorPoint::from_bytes(paper, metric),
            ],
            bytes: vec![ink, paper],
            metric,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    #[inline]
    pub fn bytes(&self, idx: usize) -> [u8; 3] {
        self.bytes[idx]
    }

    #[inline]
    pub fn rgb(&self, idx: usize) -> Rgb {
        self.points[idx].rgb
    }

    #[inline]
    pub fn point(&self, idx: usize) -> &ColorPoint {
        &self.points[idx]
    }

    /// Nearest slot to `pixel`. Ties go to the lowest index.
    #[inline]
    pub fn find_nearest(&self, pixel: Rgb) -> (usize, f32) {
        let probe = ColorPoint::new(pixel, self.metric);
        self.nearest_to_point(&probe)
    }

    pub fn nearest_to_point(&self, probe: &ColorPoint) -> (usize, f32) {
        let mut best_idx = 0;
        let mut best_dist = f32::MAX;
        for (i, point) in self.points.iter().enumerate() {
            let dist = self.metric.between(probe, point);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }
        (best_idx, best_dist)
    }

    /// Nearest and second-nearest slots, skipping slots whose color equals
    /// the nearest one. With a single distinct color both results coincide
    /// and the second distance is `f32::MAX`.
    pub fn find_two_nearest(&self, pixel: Rgb) -> ((usize, f32), (usize, f32)) {
        let probe = ColorPoint::new(pixel, self.metric);
        let first = self.nearest_to_point(&probe);

        let mut second = (first.0, f32::MAX);
        for (i, point) in self.points.iter().enumerate() {
            if self.bytes[i] == self.bytes[first.0] {
                continue;
            }
            let dist = self.metric.between(&probe, point);
            if dist < second.1 {
                second = (i, dist);
            }
        }
        (first, second)
    }
}
