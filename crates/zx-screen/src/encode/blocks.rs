//! Block planning: colors and bitmap for every attribute block.

use tracing::debug;

use crate::api::ParseOptionError;
use crate::block::{select_mono, BlockChoice, BlockSelector, UlaPlusSelector};
use crate::buffer::PixelBuffer;
use crate::color::{DistanceMetric, Rgb};
use crate::dither::{dither_cell, Dither, DitherAlgorithm, DitherOptions};
use crate::format::{COLUMNS, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::palette::{mono_palette, Palette, UlaPlusPalette, ZxPalette};

/// Where dithering happens relative to block color selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherScope {
    /// Dither the whole screen against every palette color, then pick each
    /// block's two colors from the dithered pixels.
    Global,
    /// Pick each block's colors from the source, then dither the block
    /// against just those two.
    #[default]
    PerBlock,
}

impl DitherScope {
    pub fn name(self) -> &'static str {
        match self {
            DitherScope::Global => "global",
            DitherScope::PerBlock => "per-block",
        }
    }
}

impl std::str::FromStr for DitherScope {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "global" => Ok(DitherScope::Global),
            "per-block" | "block" | "cell" => Ok(DitherScope::PerBlock),
            _ => Err(ParseOptionError::new("dither scope", s)),
        }
    }
}

impl std::fmt::Display for DitherScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The per-block outcome for a 256×192 screen, blocks in row-major order.
pub(crate) struct BlockPlan {
    pub block_height: usize,
    pub choices: Vec<BlockChoice>,
}

impl BlockPlan {
    pub fn rows(&self) -> usize {
        SCREEN_HEIGHT / self.block_height
    }

    pub fn choice(&self, col: usize, row: usize) -> &BlockChoice {
        &self.choices[row * COLUMNS + col]
    }
}

/// Resolves a block's two colors. Implemented for the 16-color and ULA+
/// selectors so one planning loop serves both.
pub(crate) trait ColorSearch {
    fn select(&self, pixels: &[Rgb]) -> BlockChoice;
    /// `(ink, paper)` colors of a choice.
    fn colors(&self, choice: &BlockChoice) -> ([u8; 3], [u8; 3]);
    /// Every color a block may use, for global dithering.
    fn search_palette(&self) -> Palette;
}

pub(crate) struct StandardSearch {
    pub selector: BlockSelector,
    pub palette: ZxPalette,
    pub metric: DistanceMetric,
}

impl ColorSearch for StandardSearch {
    fn select(&self, pixels: &[Rgb]) -> BlockChoice {
        self.selector.select(pixels)
    }

    fn colors(&self, choice: &BlockChoice) -> ([u8; 3], [u8; 3]) {
        (
            self.palette.color(choice.ink, choice.bright),
            self.palette.color(choice.paper, choice.bright),
        )
    }

    fn search_palette(&self) -> Palette {
        self.palette.search_palette(self.metric)
    }
}

pub(crate) struct UlaPlusSearch {
    pub selector: UlaPlusSelector,
    pub palette: UlaPlusPalette,
    pub metric: DistanceMetric,
}

impl ColorSearch for UlaPlusSearch {
    fn select(&self, pixels: &[Rgb]) -> BlockChoice {
        self.selector.select(pixels)
    }

    fn colors(&self, choice: &BlockChoice) -> ([u8; 3], [u8; 3]) {
        (
            self.palette.ink(choice.clut, choice.ink),
            self.palette.paper(choice.clut, choice.paper),
        )
    }

    fn search_palette(&self) -> Palette {
        let colors: Vec<[u8; 3]> = self
            .palette
            .as_bytes()
            .iter()
            .map(|&c| crate::palette::grb332_to_rgb(c))
            .collect();
        Palette::fixed(&colors, self.metric)
    }
}

/// Plan every block of a 256×192 screen.
pub(crate) fn plan_blocks(
    screen: &PixelBuffer,
    block_height: usize,
    search: &dyn ColorSearch,
    algorithm: DitherAlgorithm,
    scope: DitherScope,
    metric: DistanceMetric,
) -> BlockPlan {
    debug_assert_eq!((screen.width(), screen.height()), (SCREEN_WIDTH, SCREEN_HEIGHT));
    let rows = SCREEN_HEIGHT / block_height;
    let mut choices = Vec::with_capacity(rows * COLUMNS);

    match scope {
        DitherScope::Global => {
            let mut dithered = screen.clone();
            algorithm.dither(
                dithered.pixels_mut(),
                SCREEN_WIDTH,
                SCREEN_HEIGHT,
                &search.search_palette(),
                &DitherOptions::default(),
            );
            for row in 0..rows {
                for col in 0..COLUMNS {
                    let block = dithered.block(col * 8, row * block_height, 8, block_height);
                    choices.push(search.select(&block));
                }
            }
        }
        DitherScope::PerBlock => {
            for row in 0..rows {
                for col in 0..COLUMNS {
                    let (x, y) = (col * 8, row * block_height);
                    let mut block = screen.block(x, y, 8, block_height);
                    let mut choice = search.select(&block);
                    if algorithm != DitherAlgorithm::None {
                        let (ink, paper) = search.colors(&choice);
                        choice.bitmap = dither_cell(
                            &mut block,
                            8,
                            block_height,
                            ink,
                            paper,
                            metric,
                            algorithm,
                            (x, y),
                        );
                    }
                    choices.push(choice);
                }
            }
        }
    }

    debug!(
        blocks = choices.len(),
        block_height,
        %algorithm,
        scope = scope.name(),
        "planned attribute blocks"
    );
    BlockPlan {
        block_height,
        choices,
    }
}

/// Black/white bitmap for the first `rows` lines, `true` meaning ink.
///
/// Diffusion runs once over the whole area so no seams appear at block
/// edges.
pub(crate) fn mono_bits(
    screen: &PixelBuffer,
    rows: usize,
    algorithm: DitherAlgorithm,
    metric: DistanceMetric,
) -> Vec<bool> {
    let area = screen.region(0, 0, SCREEN_WIDTH, rows);
    if algorithm == DitherAlgorithm::None {
        return select_mono(area.pixels(), metric).bitmap;
    }
    let mut pixels = area.into_pixels();
    algorithm
        .dither(
            &mut pixels,
            SCREEN_WIDTH,
            rows,
            &mono_palette(metric),
            &DitherOptions::default(),
        )
        .into_iter()
        .map(|i| i == 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard(metric: DistanceMetric) -> StandardSearch {
        let palette = ZxPalette::default();
        StandardSearch {
            selector: BlockSelector::new(&palette, metric),
            palette,
            metric,
        }
    }

    #[test]
    fn test_plan_covers_every_block() {
        let screen = PixelBuffer::new(256, 192, Rgb::from_u8(0, 0xD7, 0));
        let search = standard(DistanceMetric::Lab);
        for height in [8, 4, 2, 1] {
            let plan = plan_blocks(
                &screen,
                height,
                &search,
                DitherAlgorithm::FloydSteinberg,
                DitherScope::PerBlock,
                DistanceMetric::Lab,
            );
            assert_eq!(plan.choices.len(), 32 * 192 / height);
            assert_eq!(plan.rows(), 192 / height);
            let choice = plan.choice(31, plan.rows() - 1);
            assert_eq!((choice.ink, choice.paper, choice.bright), (4, 4, false));
        }
    }

    #[test]
    fn test_global_and_per_block_agree_on_exact_colors() {
        let palette = ZxPalette::default();
        let mut screen = PixelBuffer::new(256, 192, Rgb::from_bytes(palette.color(1, true)));
        for y in 0..192 {
            for x in 0..256 {
                if (x / 3 + y) % 2 == 0 {
                    screen.set(x, y, Rgb::from_bytes(palette.color(6, true)));
                }
            }
        }
        let search = standard(DistanceMetric::Lab);
        let global = plan_blocks(
            &screen,
            8,
            &search,
            DitherAlgorithm::Atkinson,
            DitherScope::Global,
            DistanceMetric::Lab,
        );
        let local = plan_blocks(
            &screen,
            8,
            &search,
            DitherAlgorithm::Atkinson,
            DitherScope::PerBlock,
            DistanceMetric::Lab,
        );
        for (g, l) in global.choices.iter().zip(&local.choices) {
            assert_eq!(g.bitmap, l.bitmap);
        }
    }

    #[test]
    fn test_mono_bits_threshold() {
        let mut screen = PixelBuffer::new(256, 192, Rgb::WHITE);
        screen.set(5, 0, Rgb::new(20.0, 20.0, 20.0));
        let bits = mono_bits(&screen, 64, DitherAlgorithm::None, DistanceMetric::Lab);
        assert_eq!(bits.len(), 256 * 64);
        assert_eq!(bits.iter().filter(|&&b| b).count(), 1);
        assert!(bits[5]);
    }

    #[test]
    fn test_parse_scope() {
        assert_eq!("per_block".parse::<DitherScope>().unwrap(), DitherScope::PerBlock);
        assert_eq!("GLOBAL".parse::<DitherScope>().unwrap(), DitherScope::Global);
    }
}
