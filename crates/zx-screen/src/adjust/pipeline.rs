//! The adjustment stages and the fixed order they run in.
//!
//! Each stage is a pure function over the buffer. [`adjust`] runs them as
//! grayscale or (saturation, balance), then gamma, levels,
//! brightness/contrast, smoothing and sharpening, skipping any stage left
//! at its neutral value.

use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::color::Rgb;

use super::AdjustOptions;

/// Run the whole pipeline in place.
pub fn adjust(buffer: &mut PixelBuffer, options: &AdjustOptions) {
    if options.is_neutral() {
        return;
    }
    debug!(?options, width = buffer.width(), height = buffer.height(), "adjusting image");

    let pixels = buffer.pixels_mut();
    if options.grayscale {
        grayscale(pixels);
    } else if !options.color_neutral() {
        saturate(pixels, options.saturation);
        balance(pixels, options.balance);
    }
    if !options.gamma_neutral() {
        apply_gamma(pixels, options.gamma);
    }
    if !options.levels_neutral() {
        levels(pixels, options.black_point, options.white_point);
    }
    if !options.tone_neutral() {
        brightness_contrast(pixels, options.brightness, options.contrast);
    }
    if options.smoothing > 0 {
        *buffer = smooth(buffer, options.smoothing);
    }
    if options.sharpening > 0 {
        *buffer = sharpen(buffer, options.sharpening);
    }
}

pub fn grayscale(pixels: &mut [Rgb]) {
    for p in pixels {
        let y = p.luma();
        *p = Rgb::new(y, y, y);
    }
}

/// Scale each pixel's distance from its own luma.
pub fn saturate(pixels: &mut [Rgb], factor: f32) {
    for p in pixels {
        let y = p.luma();
        *p = p.map(|c| y + (c - y) * factor).clamped();
    }
}

pub fn balance(pixels: &mut [Rgb], multipliers: [f32; 3]) {
    let [r, g, b] = multipliers;
    for p in pixels {
        *p = Rgb::new(p.r * r, p.g * g, p.b * b).clamped();
    }
}

fn gamma_lut(gamma: f32) -> [f32; 256] {
    let exponent = 1.0 / gamma;
    let mut lut = [0.0f32; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = 255.0 * (i as f32 / 255.0).powf(exponent);
    }
    lut
}

/// `out = 255 * (in / 255)^(1/gamma)` through a 256-entry table.
pub fn apply_gamma(pixels: &mut [Rgb], gamma: f32) {
    if gamma <= 0.0 {
        return;
    }
    let lut = gamma_lut(gamma);
    for p in pixels {
        *p = p.map(|c| lut[c.round().clamp(0.0, 255.0) as usize]);
    }
}

/// Map `black` to 0 and `white` to 255, clamping outside.
pub fn levels(pixels: &mut [Rgb], black: u8, white: u8) {
    let low = black as f32;
    let range = (white as f32 - low).max(1.0);
    for p in pixels {
        *p = p.map(|c| ((c - low) * 255.0 / range).clamp(0.0, 255.0));
    }
}

/// Both amounts on -100..=100. Contrast uses the usual
/// `259(c + 255) / (255(259 - c))` factor around mid grey.
pub fn brightness_contrast(pixels: &mut [Rgb], brightness: f32, contrast: f32) {
    let c = contrast * 2.55;
    let factor = 259.0 * (c + 255.0) / (255.0 * (259.0 - c));
    let offset = brightness * 2.55;
    for p in pixels {
        *p = p
            .map(|v| factor * (v - 128.0) + 128.0 + offset)
            .clamped();
    }
}

/// Bilateral filter. `amount` 1..=100 sets the radius (1 to 5) and how
/// large a color step still counts as the same surface.
pub fn smooth(buffer: &PixelBuffer, amount: u8) -> PixelBuffer {
    let (w, h) = (buffer.width(), buffer.height());
    let radius = 1 + amount as usize / 25;
    let sigma_s = radius as f32;
    let sigma_r = 10.0 + 0.9 * amount as f32;
    let spatial_div = 2.0 * sigma_s * sigma_s;
    let range_div = 2.0 * sigma_r * sigma_r;

    let mut out = buffer.clone();
    for y in 0..h {
        for x in 0..w {
            let center = buffer.get(x, y);
            let mut sum = Rgb::BLACK;
            let mut weight_sum = 0.0;
            for ny in y.saturating_sub(radius)..(y + radius + 1).min(h) {
                for nx in x.saturating_sub(radius)..(x + radius + 1).min(w) {
                    let p = buffer.get(nx, ny);
                    let dx = nx as f32 - x as f32;
                    let dy = ny as f32 - y as f32;
                    let d = p - center;
                    let range2 = d.r * d.r + d.g * d.g + d.b * d.b;
                    let weight = (-(dx * dx + dy * dy) / spatial_div - range2 / range_div).exp();
                    sum = sum + p * weight;
                    weight_sum += weight;
                }
            }
            out.set(x, y, sum * (1.0 / weight_sum));
        }
    }
    out
}

/// Add `amount`% of the 4-neighbour Laplacian back to each pixel.
pub fn sharpen(buffer: &PixelBuffer, amount: u8) -> PixelBuffer {
    let (w, h) = (buffer.width(), buffer.height());
    let strength = amount as f32 / 100.0;
    let mut out = buffer.clone();
    for y in 0..h {
        for x in 0..w {
            let c = buffer.get(x, y);
            let up = buffer.get(x, y.saturating_sub(1));
            let down = buffer.get(x, (y + 1).min(h - 1));
            let left = buffer.get(x.saturating_sub(1), y);
            let right = buffer.get((x + 1).min(w - 1), y);
            let laplacian = c * 4.0 - up - down - left - right;
            out.set(x, y, (c + laplacian * strength).clamped());
        }
    }
    out
}
