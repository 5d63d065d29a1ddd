//! ULA+ 64-color palette: 4 CLUTs of 8 ink and 8 paper entries, each stored
//! as one GRB332 byte.

use tracing::{debug, warn};

use super::error::PaletteError;
use super::palette::Palette;
use super::zx::ZxPalette;
use crate::color::{DistanceMetric, Rgb};

pub const ULAPLUS_ENTRIES: usize = 64;
pub const CLUT_COUNT: usize = 4;

const KMEANS_ITERATIONS: usize = 8;

/// Expand a GRB332 byte (G bits 7-5, R bits 4-2, B bits 1-0) to RGB8.
#[inline]
pub fn grb332_to_rgb(byte: u8) -> [u8; 3] {
    let g = (byte >> 5) & 7;
    let r = (byte >> 2) & 7;
    let b = byte & 3;
    [expand3(r), expand3(g), b * 85]
}

/// Quantize RGB8 to the nearest GRB332 byte, channel by channel.
#[inline]
pub fn rgb_to_grb332(rgb: [u8; 3]) -> u8 {
    let r = ((rgb[0] as u16 * 7 + 127) / 255) as u8;
    let g = ((rgb[1] as u16 * 7 + 127) / 255) as u8;
    let b = ((rgb[2] as u16 * 3 + 127) / 255) as u8;
    (g << 5) | (r << 2) | b
}

#[inline]
fn expand3(v: u8) -> u8 {
    ((v as u16 * 255 + 3) / 7) as u8
}

/// The 64-byte palette trailer of a ULA+ screen.
///
/// Entry `clut * 16 + i` is ink `i` of that CLUT, `clut * 16 + 8 + i` is
/// paper `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UlaPlusPalette {
    entries: [u8; ULAPLUS_ENTRIES],
}

impl Default for UlaPlusPalette {
    /// Every CLUT holds the normal Spectrum bank as ink and the bright bank
    /// as paper.
    fn default() -> Self {
        let zx = ZxPalette::default();
        let mut entries = [0u8; ULAPLUS_ENTRIES];
        for clut in 0..CLUT_COUNT {
            for i in 0..8 {
                entries[clut * 16 + i] = rgb_to_grb332(zx.color(i as u8, false));
                entries[clut * 16 + 8 + i] = rgb_to_grb332(zx.color(i as u8, true));
            }
        }
        Self { entries }
    }
}

impl UlaPlusPalette {
    pub fn from_entries(entries: [u8; ULAPLUS_ENTRIES]) -> Self {
        Self { entries }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PaletteError> {
        let entries: [u8; ULAPLUS_ENTRIES] =
            bytes.try_into().map_err(|_| PaletteError::WrongSize {
                expected: ULAPLUS_ENTRIES,
                actual: bytes.len(),
            })?;
        Ok(Self { entries })
    }

    pub fn as_bytes(&self) -> &[u8; ULAPLUS_ENTRIES] {
        &self.entries
    }

    #[inline]
    pub fn ink(&self, clut: u8, index: u8) -> [u8; 3] {
        grb332_to_rgb(self.entries[(clut as usize & 3) * 16 + (index as usize & 7)])
    }

    #[inline]
    pub fn paper(&self, clut: u8, index: u8) -> [u8; 3] {
        grb332_to_rgb(self.entries[(clut as usize & 3) * 16 + 8 + (index as usize & 7)])
    }

    /// One CLUT as a 16-entry search palette: the 8 inks, then the 8 papers.
    pub fn clut_palette(&self, clut: u8, metric: DistanceMetric) -> Palette {
        let colors: Vec<[u8; 3]> = (0..8)
            .map(|i| self.ink(clut, i))
            .chain((0..8).map(|i| self.paper(clut, i)))
            .collect();
        Palette::fixed(&colors, metric)
    }

    /// Derive a palette for a 256×192 image.
    ///
    /// Each 8×8 block nominates its two most frequent GRB332 codes, the
    /// darker as an ink candidate and the lighter as a paper candidate.
    /// Blocks are clustered into 4 groups on those pairs so that one CLUT
    /// can serve every block in its group. Each CLUT half takes its group's
    /// 8 most frequent candidates; gaps are filled from the global histogram
    /// and then from the Spectrum defaults. Ink slot 7 is forced to black and
    /// paper slot 7 to white when the half lacks them.
    pub fn generate(pixels: &[Rgb], width: usize, height: usize) -> Self {
        let codes: Vec<u8> = pixels.iter().map(|p| rgb_to_grb332(p.to_bytes())).collect();

        let mut global = [0u32; 256];
        for &c in &codes {
            global[c as usize] += 1;
        }

        let pairs = block_pairs(&codes, width, height);
        let assignment = cluster_pairs(&pairs);

        let mut entries = [0u8; ULAPLUS_ENTRIES];
        let mut defaulted = false;
        for clut in 0..CLUT_COUNT {
            let mut ink_hist = [0u32; 256];
            let mut paper_hist = [0u32; 256];
            for (pair, &group) in pairs.iter().zip(&assignment) {
                if group == clut {
                    ink_hist[pair.ink as usize] += 1;
                    paper_hist[pair.paper as usize] += 1;
                }
            }

            let zx = ZxPalette::default();
            let ink_defaults: Vec<u8> = (0..8).map(|i| rgb_to_grb332(zx.color(i, false))).collect();
            let paper_defaults: Vec<u8> = (0..8).map(|i| rgb_to_grb332(zx.color(i, true))).collect();

            let (inks, ink_defaulted) = fill_half(&ink_hist, &global, &ink_defaults, 0x00);
            let (papers, paper_defaulted) = fill_half(&paper_hist, &global, &paper_defaults, 0xFF);
            defaulted |= ink_defaulted || paper_defaulted;

            entries[clut * 16..clut * 16 + 8].copy_from_slice(&inks);
            entries[clut * 16 + 8..clut * 16 + 16].copy_from_slice(&papers);
        }

        if defaulted {
            warn!("ULA+ palette: image has too few distinct colors, filled with default entries");
        }
        debug!(blocks = pairs.len(), "generated ULA+ palette");
        Self { entries }
    }
}

#[derive(Debug, Clone, Copy)]
struct BlockPair {
    ink: u8,
    paper: u8,
}

impl BlockPair {
    fn features(self) -> [f32; 6] {
        let i = grb332_to_rgb(self.ink);
        let p = grb332_to_rgb(self.paper);
        [
            i[0] as f32, i[1] as f32, i[2] as f32, p[0] as f32, p[1] as f32, p[2] as f32,
        ]
    }

    fn luma(self) -> f32 {
        (Rgb::from_bytes(grb332_to_rgb(self.ink)).luma()
            + Rgb::from_bytes(grb332_to_rgb(self.paper)).luma())
            * 0.5
    }
}

fn block_pairs(codes: &[u8], width: usize, height: usize) -> Vec<BlockPair> {
    let mut pairs = Vec::with_capacity((width / 8) * (height / 8));
    let mut counts: Vec<(u8, u32)> = Vec::with_capacity(64);
    for by in (0..height).step_by(8) {
        for bx in (0..width).step_by(8) {
            counts.clear();
            for y in by..(by + 8).min(height) {
                for x in bx..(bx + 8).min(width) {
                    let c = codes[y * width + x];
                    match counts.iter_mut().find(|(code, _)| *code == c) {
                        Some(entry) => entry.1 += 1,
                        None => counts.push((c, 1)),
                    }
                }
            }
            // Most frequent first, lower code on ties.
            counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
            let first = counts[0].0;
            let second = counts.get(1).map_or(first, |c| c.0);
            let luma = |c: u8| Rgb::from_bytes(grb332_to_rgb(c)).luma();
            let (ink, paper) = if luma(second) < luma(first) {
                (second, first)
            } else {
                (first, second)
            };
            pairs.push(BlockPair { ink, paper });
        }
    }
    pairs
}

/// Deterministic k-means over block pairs. Centroids start at the luma
/// quartiles; an empty cluster keeps its previous centroid.
fn cluster_pairs(pairs: &[BlockPair]) -> Vec<usize> {
    if pairs.is_empty() {
        return Vec::new();
    }

    let mut by_luma: Vec<usize> = (0..pairs.len()).collect();
    by_luma.sort_by(|&a, &b| pairs[a].luma().total_cmp(&pairs[b].luma()));
    let mut centroids: Vec<[f32; 6]> = (0..CLUT_COUNT)
        .map(|k| {
            let pos = ((2 * k + 1) * pairs.len()) / (2 * CLUT_COUNT);
            pairs[by_luma[pos.min(pairs.len() - 1)]].features()
        })
        .collect();

    let features: Vec<[f32; 6]> = pairs.iter().map(|p| p.features()).collect();
    let mut assignment = vec![0usize; pairs.len()];

    for _ in 0..KMEANS_ITERATIONS {
        let mut changed = false;
        for (slot, f) in assignment.iter_mut().zip(&features) {
            let mut best = 0;
            let mut best_d = f32::MAX;
            for (k, c) in centroids.iter().enumerate() {
                let d: f32 = f.iter().zip(c).map(|(a, b)| (a - b) * (a - b)).sum();
                if d < best_d {
                    best_d = d;
                    best = k;
                }
            }
            if *slot != best {
                *slot = best;
                changed = true;
            }
        }

        for (k, centroid) in centroids.iter_mut().enumerate() {
            let mut sum = [0f32; 6];
            let mut n = 0usize;
            for (f, &a) in features.iter().zip(&assignment) {
                if a == k {
                    for (s, v) in sum.iter_mut().zip(f) {
                        *s += v;
                    }
                    n += 1;
                }
            }
            if n > 0 {
                *centroid = sum.map(|s| s / n as f32);
            }
        }

        if !changed {
            break;
        }
    }
    assignment
}

/// Rank codes by `hist` (ties to the lower code), top up from `global` and
/// then `defaults`, and make sure `anchor` is present. Returns whether any
/// default entry was needed.
fn fill_half(hist: &[u32; 256], global: &[u32; 256], defaults: &[u8], anchor: u8) -> ([u8; 8], bool) {
    let mut out: Vec<u8> = Vec::with_capacity(8);

    for source in [hist, global] {
        let mut ranked: Vec<u8> = (0..=255u8).filter(|&c| source[c as usize] > 0).collect();
        ranked.sort_by(|&a, &b| source[b as usize].cmp(&source[a as usize]).then(a.cmp(&b)));
        for c in ranked {
            if out.len() == 8 {
                break;
            }
            if !out.contains(&c) {
                out.push(c);
            }
        }
    }

    let mut defaulted = false;
    for &c in defaults {
        if out.len() == 8 {
            break;
        }
        if !out.contains(&c) {
            out.push(c);
            defaulted = true;
        }
    }
    // Defaults may collide with image codes; pad with the anchor.
    while out.len() < 8 {
        out.push(anchor);
    }

    if !out.contains(&anchor) {
        debug!(anchor, "ULA+ palette: forcing anchor color into slot 7");
        out[7] = anchor;
    }

    let mut half = [0u8; 8];
    half.copy_from_slice(&out);
    (half, defaulted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grb332_bit_layout() {
        assert_eq!(grb332_to_rgb(0b111_000_00), [0, 255, 0]);
        assert_eq!(grb332_to_rgb(0b000_111_00), [255, 0, 0]);
        assert_eq!(grb332_to_rgb(0b000_000_11), [0, 0, 255]);
        assert_eq!(rgb_to_grb332([255, 255, 255]), 0xFF);
        assert_eq!(rgb_to_grb332([0, 0, 0]), 0x00);
    }

    #[test]
    fn test_every_code_is_a_fixed_point() {
        for code in 0..=255u8 {
            assert_eq!(rgb_to_grb332(grb332_to_rgb(code)), code);
        }
    }

    #[test]
    fn test_from_bytes_size() {
        assert!(UlaPlusPalette::from_bytes(&[0u8; 64]).is_ok());
        assert!(matches!(
            UlaPlusPalette::from_bytes(&[0u8; 63]),
            Err(PaletteError::WrongSize {
                expected: 64,
                actual: 63
            })
        ));
    }

    #[test]
    fn test_ink_paper_slots() {
        let mut entries = [0u8; 64];
        entries[2 * 16 + 3] = 0b000_111_00;
        entries[2 * 16 + 8 + 5] = 0b111_000_00;
        let pal = UlaPlusPalette::from_entries(entries);
        assert_eq!(pal.ink(2, 3), [255, 0, 0]);
        assert_eq!(pal.paper(2, 5), [0, 255, 0]);

        let search = pal.clut_palette(2, DistanceMetric::Lab);
        assert_eq!(search.len(), 16);
        assert_eq!(search.rgb(3), Rgb::from_u8(255, 0, 0));
        assert_eq!(search.rgb(8 + 5), Rgb::from_u8(0, 255, 0));
    }

    #[test]
    fn test_generate_contains_block_colors_and_anchors() {
        let (w, h) = (256, 192);
        let red = Rgb::from_u8(255, 0, 0);
        let blue = Rgb::from_u8(0, 0, 255);
        let mut pixels = vec![Rgb::BLACK; w * h];
        for y in 0..h {
            for x in 0..w {
                pixels[y * w + x] = if (x + y) % 2 == 0 { red } else { blue };
            }
        }
        let pal = UlaPlusPalette::generate(&pixels, w, h);
        let red_code = rgb_to_grb332([255, 0, 0]);
        let blue_code = rgb_to_grb332([0, 0, 255]);

        for clut in 0..4 {
            let half = &pal.as_bytes()[clut * 16..clut * 16 + 16];
            assert!(half[..8].contains(&0x00), "clut {clut} ink lacks black");
            assert!(half[8..].contains(&0xFF), "clut {clut} paper lacks white");
        }
        let bytes = pal.as_bytes();
        assert!(bytes.contains(&red_code));
        assert!(bytes.contains(&blue_code));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let pixels: Vec<Rgb> = (0..256 * 192)
            .map(|i| Rgb::from_u8((i % 251) as u8, (i % 97) as u8, (i % 13) as u8 * 19))
            .collect();
        assert_eq!(
            UlaPlusPalette::generate(&pixels, 256, 192),
            UlaPlusPalette::generate(&pixels, 256, 192)
        );
    }
}
