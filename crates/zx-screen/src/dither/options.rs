//! Per-call dithering configuration.

/// Options shared by every dithering algorithm.
///
/// ```
/// use zx_screen::DitherOptions;
///
/// let options = DitherOptions::new().origin(8, 16).seed(7);
/// assert_eq!(options.origin, (8, 16));
/// ```
#[derive(Debug, Clone)]
pub struct DitherOptions {
    /// Position of the buffer's top-left pixel on the full screen.
    ///
    /// Ordered algorithms index their threshold matrix with screen
    /// coordinates, so a block dithered on its own lines up with its
    /// neighbours. Default: `(0, 0)`.
    pub origin: (usize, usize),

    /// Accumulated error may push a channel at most this far outside
    /// 0..=255. Default: `128.0`.
    pub error_clamp: f32,

    /// Seed for the random-noise threshold. Default: `0`.
    pub seed: u64,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            origin: (0, 0),
            error_clamp: 128.0,
            seed: 0,
        }
    }
}

impl DitherOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn origin(mut self, x: usize, y: usize) -> Self {
        self.origin = (x, y);
        self
    }

    #[inline]
    pub fn error_clamp(mut self, clamp: f32) -> Self {
        self.error_clamp = clamp;
        self
    }

    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
