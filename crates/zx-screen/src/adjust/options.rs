//! Adjustment options.

/// Parameters of the adjustment pipeline.
///
/// Every field defaults to its neutral value, and a stage at its neutral
/// value is skipped.
///
/// # Example
///
/// ```
/// use zx_screen::AdjustOptions;
///
/// let options = AdjustOptions::new()
///     .gamma(1.4)
///     .contrast(20.0)
///     .sharpening(30);
/// assert!(!options.is_neutral());
/// assert!(AdjustOptions::default().is_neutral());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustOptions {
    /// Convert to luma. Saturation and balance are ignored when set.
    pub grayscale: bool,

    /// Chroma multiplier around each pixel's luma. 1.0 = no change.
    pub saturation: f32,

    /// Per-channel multipliers `[r, g, b]`. 1.0 = no change.
    pub balance: [f32; 3],

    /// Output = input^(1/gamma). 1.0 = no change.
    pub gamma: f32,

    /// Input level mapped to 0.
    pub black_point: u8,

    /// Input level mapped to 255.
    pub white_point: u8,

    /// -100..=100, added as `brightness * 2.55`.
    pub brightness: f32,

    /// -100..=100.
    pub contrast: f32,

    /// Edge-preserving smoothing strength, 0..=100.
    pub smoothing: u8,

    /// Unsharp-mask strength, 0..=100.
    pub sharpening: u8,
}

impl Default for AdjustOptions {
    fn default() -> Self {
        Self {
            grayscale: false,
            saturation: 1.0,
            balance: [1.0; 3],
            gamma: 1.0,
            black_point: 0,
            white_point: 255,
            brightness: 0.0,
            contrast: 0.0,
            smoothing: 0,
            sharpening: 0,
        }
    }
}

impl AdjustOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn grayscale(mut self, enabled: bool) -> Self {
        self.grayscale = enabled;
        self
    }

    #[inline]
    pub fn saturation(mut self, factor: f32) -> Self {
        self.saturation = factor;
        self
    }

    #[inline]
    pub fn balance(mut self, r: f32, g: f32, b: f32) -> Self {
        self.balance = [r, g, b];
        self
    }

    #[inline]
    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    #[inline]
    pub fn levels(mut self, black: u8, white: u8) -> Self {
        self.black_point = black;
        self.white_point = white;
        self
    }

    #[inline]
    pub fn brightness(mut self, amount: f32) -> Self {
        self.brightness = amount.clamp(-100.0, 100.0);
        self
    }

    #[inline]
    pub fn contrast(mut self, amount: f32) -> Self {
        self.contrast = amount.clamp(-100.0, 100.0);
        self
    }

    #[inline]
    pub fn smoothing(mut self, amount: u8) -> Self {
        self.smoothing = amount.min(100);
        self
    }

    #[inline]
    pub fn sharpening(mut self, amount: u8) -> Self {
        self.sharpening = amount.min(100);
        self
    }

    pub(crate) fn color_neutral(&self) -> bool {
        (self.saturation - 1.0).abs() < f32::EPSILON && self.balance.iter().all(|b| (b - 1.0).abs() < f32::EPSILON)
    }

    pub(crate) fn gamma_neutral(&self) -> bool {
        self.gamma <= 0.0 || (self.gamma - 1.0).abs() < f32::EPSILON
    }

    pub(crate) fn levels_neutral(&self) -> bool {
        self.black_point == 0 && self.white_point == 255
    }

    pub(crate) fn tone_neutral(&self) -> bool {
        self.brightness == 0.0 && self.contrast == 0.0
    }

    /// Whether the whole pipeline would leave pixels untouched.
    pub fn is_neutral(&self) -> bool {
        !self.grayscale
            && self.color_neutral()
            && self.gamma_neutral()
            && self.levels_neutral()
            && self.tone_neutral()
            && self.smoothing == 0
            && self.sharpening == 0
    }
}
