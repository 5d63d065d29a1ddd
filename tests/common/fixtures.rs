//! Test fixtures: temporary workspaces and synthetic inputs.

use std::path::{Path, PathBuf};

use scrconv::image_io;
use tempfile::TempDir;
use zx_screen::RgbImage;

/// Spectrum colors at the default palette levels.
pub mod colors {
    pub const BLACK: [u8; 3] = [0, 0, 0];
    pub const BLUE: [u8; 3] = [0, 0, 0xD7];
    pub const RED: [u8; 3] = [0xD7, 0, 0];
    pub const WHITE: [u8; 3] = [0xD7, 0xD7, 0xD7];
    pub const BRIGHT_YELLOW: [u8; 3] = [0xFF, 0xFF, 0];
}

/// A scratch directory that disappears with the test.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, bytes).expect("write fixture");
        path
    }

    pub fn write_png(&self, name: &str, image: &RgbImage) -> PathBuf {
        let path = self.path(name);
        image_io::write_png(&path, image).expect("write PNG fixture");
        path
    }

    pub fn read(&self, path: &Path) -> Vec<u8> {
        std::fs::read(path).expect("read output")
    }
}

/// Left half `left`, right half `right`, every cell one color.
pub fn split_image(width: usize, height: usize, left: [u8; 3], right: [u8; 3]) -> RgbImage {
    let mut image = RgbImage::filled(width, height, right);
    image.fill_rect(0, 0, width / 2, height, left);
    image
}

/// A standard screen: every cell paper `paper`, ink `ink`, bitmap byte
/// `bits` everywhere.
pub fn scr(ink: u8, paper: u8, bits: u8) -> Vec<u8> {
    let mut bytes = vec![bits; 6912];
    bytes[6144..].fill((paper << 3) | ink);
    bytes
}
