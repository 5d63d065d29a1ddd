//! Crop and scale a source image onto the target canvas.

use std::fmt;
use std::str::FromStr;

use crate::api::ParseOptionError;
use crate::buffer::PixelBuffer;
use crate::color::Rgb;

/// How the source is placed on a canvas of a different aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Scale both axes independently to cover the canvas.
    Stretch,
    /// Keep the aspect ratio and letterbox with the background color.
    #[default]
    Fit,
    /// Keep the aspect ratio and crop what overflows.
    Fill,
}

impl FitMode {
    pub fn name(self) -> &'static str {
        match self {
            FitMode::Stretch => "stretch",
            FitMode::Fit => "fit",
            FitMode::Fill => "fill",
        }
    }
}

impl FromStr for FitMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stretch" => Ok(FitMode::Stretch),
            "fit" | "contain" => Ok(FitMode::Fit),
            "fill" | "cover" => Ok(FitMode::Fill),
            _ => Err(ParseOptionError::new("fit mode", s)),
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A rectangle of the source image, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CropRect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Intersect with a `width`×`height` image. `None` if nothing is left.
    fn clipped(self, width: usize, height: usize) -> Option<CropRect> {
        let x = self.x.min(width);
        let y = self.y.min(height);
        let w = self.width.min(width - x);
        let h = self.height.min(height - y);
        (w > 0 && h > 0).then_some(CropRect::new(x, y, w, h))
    }
}

/// Source window in float coordinates.
#[derive(Debug, Clone, Copy)]
struct Window {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

/// Scale `source` (optionally cropped first) onto a `width`×`height`
/// canvas with bilinear filtering.
pub fn fit(
    source: &PixelBuffer,
    crop: Option<CropRect>,
    mode: FitMode,
    width: usize,
    height: usize,
    background: Rgb,
) -> PixelBuffer {
    let full = CropRect::new(0, 0, source.width(), source.height());
    let crop = crop
        .and_then(|c| c.clipped(source.width(), source.height()))
        .unwrap_or(full);
    // Nothing to sample from an empty source.
    if crop.width == 0 || crop.height == 0 {
        return PixelBuffer::new(width, height, background);
    }

    let mut window = Window {
        x: crop.x as f32,
        y: crop.y as f32,
        width: crop.width as f32,
        height: crop.height as f32,
    };
    // Destination rectangle on the canvas.
    let (mut dx, mut dy, mut dw, mut dh) = (0usize, 0usize, width, height);

    let src_aspect = window.width / window.height;
    let dst_aspect = width as f32 / height as f32;
    match mode {
        FitMode::Stretch => {}
        FitMode::Fit => {
            if src_aspect > dst_aspect {
                dh = ((width as f32 / src_aspect).round() as usize).clamp(1, height);
                dy = (height - dh) / 2;
            } else {
                dw = ((height as f32 * src_aspect).round() as usize).clamp(1, width);
                dx = (width - dw) / 2;
            }
        }
        FitMode::Fill => {
            if src_aspect > dst_aspect {
                let w = window.height * dst_aspect;
                window.x += (window.width - w) / 2.0;
                window.width = w;
            } else {
                let h = window.width / dst_aspect;
                window.y += (window.height - h) / 2.0;
                window.height = h;
            }
        }
    }

    let mut out = PixelBuffer::new(width, height, background);
    let sx_scale = window.width / dw as f32;
    let sy_scale = window.height / dh as f32;
    for y in 0..dh {
        let sy = window.y + (y as f32 + 0.5) * sy_scale - 0.5;
        for x in 0..dw {
            let sx = window.x + (x as f32 + 0.5) * sx_scale - 0.5;
            out.set(dx + x, dy + y, sample_bilinear(source, &crop, sx, sy));
        }
    }
    out
}

/// Bilinear sample at `(sx, sy)`, with coordinates clamped to `bounds`.
fn sample_bilinear(source: &PixelBuffer, bounds: &CropRect, sx: f32, sy: f32) -> Rgb {
    let max_x = (bounds.x + bounds.width - 1) as f32;
    let max_y = (bounds.y + bounds.height - 1) as f32;
    let sx = sx.clamp(bounds.x as f32, max_x);
    let sy = sy.clamp(bounds.y as f32, max_y);

    let x0 = sx.floor() as usize;
    let y0 = sy.floor() as usize;
    let x1 = (x0 + 1).min(max_x as usize);
    let y1 = (y0 + 1).min(max_y as usize);
    let fx = sx - x0 as f32;
    let fy = sy - y0 as f32;

    let lerp = |a: Rgb, b: Rgb, t: f32| a + (b - a) * t;
    let top = lerp(source.get(x0, y0), source.get(x1, y0), fx);
    let bottom = lerp(source.get(x0, y1), source.get(x1, y1), fx);
    lerp(top, bottom, fy)
}
