//! Riemersma dithering along a Hilbert curve.

use std::collections::VecDeque;

use crate::color::Rgb;
use crate::palette::Palette;

use super::{clamp_channel, Dither, DitherOptions};

const HISTORY: usize = 16;
/// Ratio between the newest and the oldest history weight.
const WEIGHT_RATIO: f32 = 16.0;

/// Riemersma dithering.
///
/// Pixels are visited along a Hilbert curve of order
/// `ceil(log2(max(width, height)))`, skipping curve points outside the
/// buffer. Instead of spreading error to spatial neighbours, the last 16
/// quantization errors are kept in a queue and their weighted mean is added
/// to the next pixel. Weights fall geometrically from 1 for the newest
/// entry to 1/16 for the oldest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Riemersma;

fn weights() -> [f32; HISTORY] {
    let mut w = [0f32; HISTORY];
    for (i, slot) in w.iter_mut().enumerate() {
        // i = 0 is the oldest entry.
        let t = (HISTORY - 1 - i) as f32 / (HISTORY - 1) as f32;
        *slot = WEIGHT_RATIO.powf(-t);
    }
    w
}

/// Map distance `d` along a Hilbert curve filling a `side`×`side` square
/// (side a power of two) to `(x, y)`.
fn hilbert_d2xy(side: usize, d: usize) -> (usize, usize) {
    let (mut x, mut y) = (0usize, 0usize);
    let mut t = d;
    let mut s = 1;
    while s < side {
        let rx = 1 & (t / 2);
        let ry = 1 & (t ^ rx);
        if ry == 0 {
            if rx == 1 {
                x = s - 1 - x;
                y = s - 1 - y;
            }
            std::mem::swap(&mut x, &mut y);
        }
        x += s * rx;
        y += s * ry;
        t /= 4;
        s *= 2;
    }
    (x, y)
}

impl Dither for Riemersma {
    fn dither(
        &self,
        pixels: &mut [Rgb],
        width: usize,
        height: usize,
        palette: &Palette,
        options: &DitherOptions,
    ) -> Vec<u8> {
        let mut output = vec![0u8; width * height];
        if width == 0 || height == 0 {
            return output;
        }

        let side = width.max(height).next_power_of_two();
        let weights = weights();
        let mut history: VecDeque<[f32; 3]> = VecDeque::with_capacity(HISTORY);

        for d in 0..side * side {
            let (x, y) = hilbert_d2xy(side, d);
            if x >= width || y >= height {
                continue;
            }
            let idx = y * width + x;

            let mut carried = [0f32; 3];
            if !history.is_empty() {
                // Newest entries sit at the back and pair with the heaviest
                // weights.
                let offset = HISTORY - history.len();
                let mut total = 0.0;
                for (e, &w) in history.iter().zip(&weights[offset..]) {
                    for c in 0..3 {
                        carried[c] += e[c] * w;
                    }
                    total += w;
                }
                for c in carried.iter_mut() {
                    *c /= total;
                }
            }

            let pixel = Rgb::new(
                clamp_channel(pixels[idx].r + carried[0], options.error_clamp),
                clamp_channel(pixels[idx].g + carried[1], options.error_clamp),
                clamp_channel(pixels[idx].b + carried[2], options.error_clamp),
            );
            let (nearest, _) = palette.find_nearest(pixel);
            let chosen = palette.rgb(nearest);
            output[idx] = nearest as u8;
            pixels[idx] = chosen;

            if history.len() == HISTORY {
                history.pop_front();
            }
            history.push_back([pixel.r - chosen.r, pixel.g - chosen.g, pixel.b - chosen.b]);
        }

        output
    }
}
