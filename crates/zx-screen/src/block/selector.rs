//! Exhaustive per-block ink/paper search.

use crate::color::{ColorPoint, DistanceMetric, Rgb};
use crate::palette::{Palette, UlaPlusPalette, ZxPalette, CLUT_COUNT};

/// The attribute chosen for one block and the bitmap it implies.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockChoice {
    pub ink: u8,
    pub paper: u8,
    pub bright: bool,
    /// ULA+ CLUT, zero elsewhere.
    pub clut: u8,
    /// Σ min(dist(pixel, ink), dist(pixel, paper)) over the block.
    pub error: f32,
    /// One entry per pixel, `true` where the pixel is closer to ink (or
    /// equally close).
    pub bitmap: Vec<bool>,
}

/// Distances from every block pixel to every candidate color, computed
/// once so the combination search only adds numbers.
struct DistanceTable {
    rows: Vec<Vec<f32>>,
}

impl DistanceTable {
    fn new(pixels: &[Rgb], palette: &Palette) -> Self {
        let metric = palette.metric();
        let rows = pixels
            .iter()
            .map(|&p| {
                let probe = ColorPoint::new(p, metric);
                (0..palette.len())
                    .map(|i| metric.between(&probe, palette.point(i)))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    #[inline]
    fn pair_error(&self, ink: usize, paper: usize) -> f32 {
        self.rows.iter().map(|row| row[ink].min(row[paper])).sum()
    }

    fn bitmap(&self, ink: usize, paper: usize) -> Vec<bool> {
        self.rows.iter().map(|row| row[ink] <= row[paper]).collect()
    }
}

fn is_uniform(pixels: &[Rgb]) -> bool {
    pixels.windows(2).all(|w| w[0] == w[1])
}

/// Chooses ink, paper and bright for blocks of the 16-color palette.
///
/// The search tries all 2 × 8 × 8 combinations in increasing
/// (bright, ink, paper) order and keeps the first one with the lowest error.
///
/// ```
/// use zx_screen::{BlockSelector, DistanceMetric, Rgb, ZxPalette};
///
/// let palette = ZxPalette::default();
/// let selector = BlockSelector::new(&palette, DistanceMetric::Lab);
/// let mut block = vec![Rgb::from_u8(0, 0, 0xD7); 32];
/// block.extend(vec![Rgb::from_u8(0xD7, 0xD7, 0); 32]);
/// let choice = selector.select(&block);
/// assert_eq!((choice.ink, choice.paper, choice.bright), (1, 6, false));
/// assert_eq!(choice.error, 0.0);
/// ```
pub struct BlockSelector {
    search: Palette,
}

impl BlockSelector {
    pub fn new(palette: &ZxPalette, metric: DistanceMetric) -> Self {
        Self {
            search: palette.search_palette(metric),
        }
    }

    pub fn select(&self, pixels: &[Rgb]) -> BlockChoice {
        if let Some(choice) = self.select_uniform(pixels) {
            return choice;
        }

        let table = DistanceTable::new(pixels, &self.search);
        let mut best = (0usize, 0usize, f32::MAX);
        for bank in [0usize, 8] {
            for ink in 0..8 {
                for paper in 0..8 {
                    let error = table.pair_error(bank + ink, bank + paper);
                    if error < best.2 {
                        best = (bank + ink, bank + paper, error);
                    }
                }
            }
        }

        let (ink, paper, error) = best;
        BlockChoice {
            ink: (ink % 8) as u8,
            paper: (paper % 8) as u8,
            bright: ink >= 8,
            clut: 0,
            error,
            bitmap: table.bitmap(ink, paper),
        }
    }

    /// A one-color block takes the nearest slot as both ink and paper.
    fn select_uniform(&self, pixels: &[Rgb]) -> Option<BlockChoice> {
        let first = *pixels.first()?;
        if !is_uniform(pixels) {
            return None;
        }
        let (slot, dist) = self.search.find_nearest(first);
        Some(BlockChoice {
            ink: (slot % 8) as u8,
            paper: (slot % 8) as u8,
            bright: slot >= 8,
            clut: 0,
            error: dist * pixels.len() as f32,
            bitmap: vec![true; pixels.len()],
        })
    }

    /// Choose colors for a block whose bitmap is fixed in advance
    /// (`pattern[i]` true means ink). Used by the attribute-only format.
    pub fn select_with_pattern(&self, pixels: &[Rgb], pattern: &[bool]) -> BlockChoice {
        let table = DistanceTable::new(pixels, &self.search);
        let mut best = (0usize, 0usize, f32::MAX);
        for bank in [0usize, 8] {
            for ink in 0..8 {
                for paper in 0..8 {
                    let error: f32 = table
                        .rows
                        .iter()
                        .zip(pattern)
                        .map(|(row, &is_ink)| row[if is_ink { bank + ink } else { bank + paper }])
                        .sum();
                    if error < best.2 {
                        best = (bank + ink, bank + paper, error);
                    }
                }
            }
        }

        let (ink, paper, error) = best;
        BlockChoice {
            ink: (ink % 8) as u8,
            paper: (paper % 8) as u8,
            bright: ink >= 8,
            clut: 0,
            error,
            bitmap: pattern.to_vec(),
        }
    }
}

/// Chooses CLUT, ink and paper for ULA+ blocks: 4 × 8 × 8 combinations in
/// increasing (clut, ink, paper) order.
pub struct UlaPlusSelector {
    /// Per CLUT: 8 inks followed by 8 papers.
    cluts: Vec<Palette>,
}

impl UlaPlusSelector {
    pub fn new(palette: &UlaPlusPalette, metric: DistanceMetric) -> Self {
        let cluts = (0..CLUT_COUNT as u8)
            .map(|clut| palette.clut_palette(clut, metric))
            .collect();
        Self { cluts }
    }

    pub fn select(&self, pixels: &[Rgb]) -> BlockChoice {
        let mut best: Option<(usize, usize, usize, f32, DistanceTable)> = None;
        for (clut, palette) in self.cluts.iter().enumerate() {
            let table = DistanceTable::new(pixels, palette);
            let mut local = (0usize, 8usize, f32::MAX);
            for ink in 0..8 {
                for paper in 8..16 {
                    let error = table.pair_error(ink, paper);
                    if error < local.2 {
                        local = (ink, paper, error);
                    }
                }
            }
            if best.as_ref().map_or(true, |b| local.2 < b.3) {
                best = Some((clut, local.0, local.1, local.2, table));
            }
        }

        match best {
            Some((clut, ink, paper, error, table)) => BlockChoice {
                ink: ink as u8,
                paper: (paper - 8) as u8,
                bright: false,
                clut: clut as u8,
                error,
                bitmap: table.bitmap(ink, paper),
            },
            None => BlockChoice {
                ink: 0,
                paper: 0,
                bright: false,
                clut: 0,
                error: 0.0,
                bitmap: vec![true; pixels.len()],
            },
        }
    }
}

/// Monochrome blocks skip the search: ink is black, paper white, and each
/// pixel goes to whichever is closer.
pub fn select_mono(pixels: &[Rgb], metric: DistanceMetric) -> BlockChoice {
    let pair = Palette::pair([0, 0, 0], [0xFF, 0xFF, 0xFF], metric);
    let table = DistanceTable::new(pixels, &pair);
    BlockChoice {
        ink: 0,
        paper: 7,
        bright: true,
        clut: 0,
        error: table.pair_error(0, 1),
        bitmap: table.bitmap(0, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::rgb_to_grb332;

    fn zx(idx: u8, bright: bool) -> Rgb {
        Rgb::from_bytes(ZxPalette::default().color(idx, bright))
    }

    #[test]
    fn test_uniform_block_is_both_colors() {
        let selector = BlockSelector::new(&ZxPalette::default(), DistanceMetric::Lab);
        for bright in [false, true] {
            for idx in 1..8 {
                let choice = selector.select(&vec![zx(idx, bright); 64]);
                assert_eq!(choice.ink, idx);
                assert_eq!(choice.paper, idx);
                assert_eq!(choice.bright, bright);
                assert_eq!(choice.error, 0.0);
                assert!(choice.bitmap.iter().all(|&b| b));
            }
        }
    }

    #[test]
    fn test_black_block_prefers_normal_bank() {
        let selector = BlockSelector::new(&ZxPalette::default(), DistanceMetric::Lab);
        let choice = selector.select(&vec![Rgb::BLACK; 64]);
        assert!(!choice.bright);
        assert_eq!(choice.ink, 0);
    }

    #[test]
    fn test_two_color_block_exact() {
        let selector = BlockSelector::new(&ZxPalette::default(), DistanceMetric::WeightedRgb);
        let pixels: Vec<Rgb> = (0..64)
            .map(|i| if i % 2 == 0 { zx(2, true) } else { zx(5, true) })
            .collect();
        let choice = selector.select(&pixels);
        assert!(choice.bright);
        assert_eq!(choice.error, 0.0);
        // First in (ink, paper) order wins, so the lower index is ink.
        assert_eq!((choice.ink, choice.paper), (2, 5));
        for (i, bit) in choice.bitmap.iter().enumerate() {
            assert_eq!(*bit, i % 2 == 0);
        }
    }

    #[test]
    fn test_equidistant_pixel_goes_to_ink() {
        // Halfway between black (slot 0) and blue (slot 1): same red mean,
        // same blue delta, so both distances are exactly equal.
        let midway = Rgb::new(0.0, 0.0, 107.5);
        let mut pixels = vec![zx(0, false); 32];
        pixels.extend(vec![zx(1, false); 31]);
        pixels.push(midway);

        let selector = BlockSelector::new(&ZxPalette::default(), DistanceMetric::WeightedRgb);
        let choice = selector.select(&pixels);
        assert_eq!((choice.ink, choice.paper, choice.bright), (0, 1, false));
        assert!(choice.bitmap[63]);
        assert!(choice.bitmap[..32].iter().all(|&b| b));
        assert!(choice.bitmap[32..63].iter().all(|&b| !b));
    }

    #[test]
    fn test_pattern_selection_respects_fixed_bitmap() {
        let selector = BlockSelector::new(&ZxPalette::default(), DistanceMetric::Lab);
        let pattern: Vec<bool> = (0..64).map(|i| (i / 8 + i % 8) % 2 == 0).collect();
        let pixels: Vec<Rgb> = pattern
            .iter()
            .map(|&ink| if ink { zx(4, false) } else { zx(1, false) })
            .collect();
        let choice = selector.select_with_pattern(&pixels, &pattern);
        assert_eq!((choice.ink, choice.paper, choice.bright), (4, 1, false));
        assert_eq!(choice.bitmap, pattern);
    }

    #[test]
    fn test_ulaplus_finds_clut() {
        let mut entries = [0u8; 64];
        entries[3 * 16 + 2] = rgb_to_grb332([255, 0, 0]);
        entries[3 * 16 + 8 + 6] = rgb_to_grb332([0, 255, 0]);
        let palette = UlaPlusPalette::from_entries(entries);
        let selector = UlaPlusSelector::new(&palette, DistanceMetric::Lab);

        let pixels: Vec<Rgb> = (0..64)
            .map(|i| {
                if i < 20 {
                    Rgb::from_u8(255, 0, 0)
                } else {
                    Rgb::from_u8(0, 255, 0)
                }
            })
            .collect();
        let choice = selector.select(&pixels);
        assert_eq!((choice.clut, choice.ink, choice.paper), (3, 2, 6));
        assert_eq!(choice.error, 0.0);
        assert_eq!(choice.bitmap.iter().filter(|&&b| b).count(), 20);
    }

    #[test]
    fn test_mono_threshold() {
        let pixels = vec![Rgb::from_u8(10, 10, 10), Rgb::from_u8(240, 240, 240)];
        let choice = select_mono(&pixels, DistanceMetric::Lab);
        assert_eq!(choice.bitmap, vec![true, false]);
    }
}
