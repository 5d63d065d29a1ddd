//! Dithering: quantizing a float RGB buffer to a palette.
//!
//! Three families share one [`Dither`] trait:
//!
//! - **Error diffusion** pushes each pixel's quantization error onto
//!   unvisited neighbours through a fixed [`Kernel`], or, for
//!   [`Riemersma`], along a Hilbert curve through a short history queue.
//! - **Ordered** picks between the two nearest palette colors using a tiled
//!   threshold ([`Bayer4`], [`Bayer8`], [`BlueNoise`], [`ClusteredDot`]) or a
//!   seeded random one ([`RandomNoise`]).
//! - **None** maps every pixel to its nearest color.
//!
//! Every algorithm overwrites the buffer with exact palette colors and
//! returns the chosen indices. [`dither_cell`] runs the same algorithms
//! inside one attribute block against its two resolved colors.
//!
//! ```
//! use zx_screen::{dither, DistanceMetric, DitherAlgorithm, Palette, Rgb};
//!
//! let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]], DistanceMetric::Lab).unwrap();
//! let mut pixels = vec![Rgb::from_u8(128, 128, 128); 16];
//! let indices = dither(&mut pixels, 4, 4, &palette, DitherAlgorithm::FloydSteinberg);
//! assert_eq!(indices.len(), 16);
//! assert!(pixels.iter().all(|p| *p == Rgb::BLACK || *p == Rgb::WHITE));
//! ```

mod atkinson;
mod blue_noise;
mod cell;
mod floyd_steinberg;
mod jjn;
mod kernel;
mod noise;
mod options;
mod ordered;
mod riemersma;
mod sierra;
mod stucki;

pub use atkinson::Atkinson;
pub use blue_noise::BlueNoise;
pub use cell::dither_cell;
pub use floyd_steinberg::{FloydSteinberg, Serpentine};
pub use jjn::JarvisJudiceNinke;
pub use kernel::*;
pub use noise::RandomNoise;
pub use options::DitherOptions;
pub use ordered::{Bayer4, Bayer8, ClusteredDot};
pub use riemersma::Riemersma;
pub use sierra::{Sierra, SierraLite, SierraTwoRow};
pub use stucki::{Burkes, Stucki};

use std::fmt;
use std::str::FromStr;

use crate::api::ParseOptionError;
use crate::color::Rgb;
use crate::palette::Palette;

/// Dithering algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DitherAlgorithm {
    /// Nearest color, no dithering.
    None,
    #[default]
    FloydSteinberg,
    JarvisJudiceNinke,
    Stucki,
    Burkes,
    Sierra,
    SierraLite,
    SierraTwoRow,
    /// 6/8 of the error is passed on.
    Atkinson,
    /// Floyd-Steinberg with alternating scan direction.
    Serpentine,
    /// Hilbert-curve traversal with a 16-entry error history.
    Riemersma,
    Bayer4,
    Bayer8,
    BlueNoise,
    /// Clustered-dot 8×8 threshold.
    Pattern,
    /// Seeded uniform random threshold.
    Noise,
}

impl DitherAlgorithm {
    pub const ALL: [DitherAlgorithm; 16] = [
        DitherAlgorithm::None,
        DitherAlgorithm::FloydSteinberg,
        DitherAlgorithm::JarvisJudiceNinke,
        DitherAlgorithm::Stucki,
        DitherAlgorithm::Burkes,
        DitherAlgorithm::Sierra,
        DitherAlgorithm::SierraLite,
        DitherAlgorithm::SierraTwoRow,
        DitherAlgorithm::Atkinson,
        DitherAlgorithm::Serpentine,
        DitherAlgorithm::Riemersma,
        DitherAlgorithm::Bayer4,
        DitherAlgorithm::Bayer8,
        DitherAlgorithm::BlueNoise,
        DitherAlgorithm::Pattern,
        DitherAlgorithm::Noise,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DitherAlgorithm::None => "none",
            DitherAlgorithm::FloydSteinberg => "floyd-steinberg",
            DitherAlgorithm::JarvisJudiceNinke => "jarvis-judice-ninke",
            DitherAlgorithm::Stucki => "stucki",
            DitherAlgorithm::Burkes => "burkes",
            DitherAlgorithm::Sierra => "sierra",
            DitherAlgorithm::SierraLite => "sierra-lite",
            DitherAlgorithm::SierraTwoRow => "sierra-2",
            DitherAlgorithm::Atkinson => "atkinson",
            DitherAlgorithm::Serpentine => "serpentine",
            DitherAlgorithm::Riemersma => "riemersma",
            DitherAlgorithm::Bayer4 => "bayer4",
            DitherAlgorithm::Bayer8 => "bayer8",
            DitherAlgorithm::BlueNoise => "blue-noise",
            DitherAlgorithm::Pattern => "pattern",
            DitherAlgorithm::Noise => "noise",
        }
    }

    /// Whether the algorithm carries error between pixels.
    pub fn is_error_diffusion(self) -> bool {
        matches!(
            self,
            DitherAlgorithm::FloydSteinberg
                | DitherAlgorithm::JarvisJudiceNinke
                | DitherAlgorithm::Stucki
                | DitherAlgorithm::Burkes
                | DitherAlgorithm::Sierra
                | DitherAlgorithm::SierraLite
                | DitherAlgorithm::SierraTwoRow
                | DitherAlgorithm::Atkinson
                | DitherAlgorithm::Serpentine
                | DitherAlgorithm::Riemersma
        )
    }

    fn ditherer(self) -> &'static dyn Dither {
        match self {
            DitherAlgorithm::None => &Nearest,
            DitherAlgorithm::FloydSteinberg => &FloydSteinberg,
            DitherAlgorithm::JarvisJudiceNinke => &JarvisJudiceNinke,
            DitherAlgorithm::Stucki => &Stucki,
            DitherAlgorithm::Burkes => &Burkes,
            DitherAlgorithm::Sierra => &Sierra,
            DitherAlgorithm::SierraLite => &SierraLite,
            DitherAlgorithm::SierraTwoRow => &SierraTwoRow,
            DitherAlgorithm::Atkinson => &Atkinson,
            DitherAlgorithm::Serpentine => &Serpentine,
            DitherAlgorithm::Riemersma => &Riemersma,
            DitherAlgorithm::Bayer4 => &Bayer4,
            DitherAlgorithm::Bayer8 => &Bayer8,
            DitherAlgorithm::BlueNoise => &BlueNoise,
            DitherAlgorithm::Pattern => &ClusteredDot,
            DitherAlgorithm::Noise => &RandomNoise,
        }
    }
}

impl Dither for DitherAlgorithm {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        self.ditherer()
            .dither(pixels, width, height, palette, options)
    }
}

impl FromStr for DitherAlgorithm {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        let alias = match key.as_str() {
            "fs" | "floyd" => "floyd-steinberg",
            "jjn" | "jarvis" => "jarvis-judice-ninke",
            "sierra-two-row" | "sierra2" => "sierra-2",
            "bluenoise" | "blue" => "blue-noise",
            "bayer" => "bayer4",
            "ordered" | "clustered" | "clustered-dot" => "pattern",
            "random" => "noise",
            other => other,
        };
        DitherAlgorithm::ALL
            .into_iter()
            .find(|a| a.name() == alias)
            .ok_or_else(|| ParseOptionError::new("dither algorithm", s))
    }
}

impl fmt::Display for DitherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dithering algorithm.
pub trait Dither {
    /// Quantize `pixels` (row-major, `width * height`) to `palette`.
    ///
    /// On return every pixel equals `palette.rgb(i)` for the returned index
    /// `i` at the same position.
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8>;
}

/// Dither a whole buffer in place with default options.
pub fn dither(
    buffer: &mut [Rgb],
    width: usize,
    height: usize,
    palette: &Palette,
    algorithm: DitherAlgorithm,
) -> Vec<u8> {
    algorithm.dither(buffer, width, height, palette, &DitherOptions::default())
}

/// Nearest color only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nearest;

impl Dither for Nearest {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        _width: usize,
        _height: usize,
        palette: &Palette,
        _options: &DitherOptions,
    ) -> Vec<u8> {
        pixels
            .iter_mut()
            .map(|p| {
                let (idx, _) = palette.find_nearest(*p);
                *p = palette.rgb(idx);
                idx as u8
            })
            .collect()
    }
}

/// Sliding window of error rows.
///
/// Only the rows a kernel can reach are stored: `rows[0]` is the current
/// row, `rows[1]` the next, and so on.
#[derive(Debug)]
pub struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a pixel `row_offset` rows below. Out-of-bounds targets
    /// are dropped.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

#[inline]
pub(crate) fn clamp_channel(value: f32, max_error: f32) -> f32 {
    value.clamp(-max_error, 255.0 + max_error)
}

/// Kernel-driven error diffusion shared by every kernel algorithm.
///
/// With `serpentine` set, odd rows run right to left and the kernel is
/// mirrored.
pub(crate) fn dither_with_kernel(
    pixels: &mut [Rgb],
    width: usize,
    height: usize,
    palette: &Palette,
    kernel: &Kernel,
    serpentine: bool,
    options: &DitherOptions,
) -> Vec<u8> {
    let mut output = vec![0u8; width * height];
    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);
    let divisor = kernel.divisor as f32;

    for y in 0..height {
        let reverse = serpentine && y % 2 == 1;
        for step in 0..width {
            let x = if reverse { width - 1 - step } else { step };
            let idx = y * width + x;

            let accumulated = error_buf.get_accumulated(x);
            let pixel = Rgb::new(
                clamp_channel(pixels[idx].r + accumulated[0], options.error_clamp),
                clamp_channel(pixels[idx].g + accumulated[1], options.error_clamp),
                clamp_channel(pixels[idx].b + accumulated[2], options.error_clamp),
            );

            let (nearest, _) = palette.find_nearest(pixel);
            let chosen = palette.rgb(nearest);
            output[idx] = nearest as u8;
            pixels[idx] = chosen;

            let error = [pixel.r - chosen.r, pixel.g - chosen.g, pixel.b - chosen.b];
            for &(dx, dy, weight) in kernel.entries {
                let dx = if reverse { -dx } else { dx };
                let nx = x as i32 + dx;
                let ny = y + dy as usize;
                if nx < 0 || nx as usize >= width || ny >= height {
                    continue;
                }
                let k = weight as f32 / divisor;
                error_buf.add_error(
                    nx as usize,
                    dy as usize,
                    [error[0] * k, error[1] * k, error[2] * k],
                );
            }
        }
        error_buf.advance_row();
    }

    output
}

/// Choose between the two nearest palette colors with a threshold in
/// `0..1`. The nearer color wins in proportion to how much closer it is;
/// when both are equally far the threshold splits them evenly.
#[inline]
pub(crate) fn ordered_pick(pixel: Rgb, palette: &Palette, threshold: f32) -> usize {
    let ((first, d1), (second, d2)) = palette.find_two_nearest(pixel);
    if d2 == f32::MAX {
        return first;
    }
    let total = d1 + d2;
    let blend = if total > 0.0 { d1 / total } else { 0.5 };
    if threshold < 1.0 - blend {
        first
    } else {
        second
    }
}

/// Ordered dithering against a square threshold matrix holding each value
/// `0..size*size` once.
pub(crate) fn dither_with_matrix<const N: usize>(
    pixels: &mut [Rgb],
    width: usize,
    height: usize,
    palette: &Palette,
    matrix: &[[u8; N]; N],
    options: &DitherOptions,
) -> Vec<u8> {
    let levels = (N * N) as f32;
    let (ox, oy) = options.origin;
    let mut output = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let v = matrix[(oy + y) % N][(ox + x) % N];
            let threshold = (v as f32 + 0.5) / levels;
            let chosen = ordered_pick(pixels[idx], palette, threshold);
            output[idx] = chosen as u8;
            pixels[idx] = palette.rgb(chosen);
        }
    }
    output
}
