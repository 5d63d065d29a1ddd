//! CIE L*a*b* conversion (D65) with a process-wide memo for palette colors.

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use super::lut::srgb_to_linear;
use super::rgb::Rgb;

/// D65 reference white.
const WHITE_X: f32 = 0.950_47;
const WHITE_Y: f32 = 1.0;
const WHITE_Z: f32 = 1.088_83;

/// (6/29)^3, the switch point between the cube-root and linear segments.
const EPSILON: f32 = 0.008_856_452;
/// 1 / (3 * (6/29)^2)
const LINEAR_SLOPE: f32 = 7.787_037;
const LINEAR_OFFSET: f32 = 4.0 / 29.0;

/// A color in CIE L*a*b* space.
///
/// `l` runs 0..=100; `a` and `b` are unbounded but stay within roughly
/// ±128 for sRGB input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl Lab {
    #[inline]
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// CIE76 ΔE: Euclidean distance in Lab.
    #[inline]
    pub fn delta_e(self, other: Lab) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }

    /// Lab of an exact 8-bit color, memoized for the life of the process.
    ///
    /// Palette entries are looked up many times per conversion; the cache is
    /// never invalidated because the mapping is a pure function.
    pub fn of_bytes(bytes: [u8; 3]) -> Lab {
        static CACHE: OnceLock<RwLock<HashMap<[u8; 3], Lab>>> = OnceLock::new();
        let cache = CACHE.get_or_init(|| RwLock::new(HashMap::new()));

        if let Ok(map) = cache.read() {
            if let Some(&lab) = map.get(&bytes) {
                return lab;
            }
        }

        let lab = Lab::from(Rgb::from_bytes(bytes));
        if let Ok(mut map) = cache.write() {
            map.insert(bytes, lab);
        }
        lab
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        LINEAR_SLOPE * t + LINEAR_OFFSET
    }
}

impl From<Rgb> for Lab {
    /// sRGB → linear → XYZ (D65) → Lab.
    fn from(rgb: Rgb) -> Self {
        let r = srgb_to_linear(rgb.r / 255.0);
        let g = srgb_to_linear(rgb.g / 255.0);
        let b = srgb_to_linear(rgb.b / 255.0);

        let x = 0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b;
        let y = 0.212_672_9 * r + 0.715_152_2 * g + 0.072_175 * b;
        let z = 0.019_333_9 * r + 0.119_192 * g + 0.950_304_1 * b;

        let fx = lab_f(x / WHITE_X);
        let fy = lab_f(y / WHITE_Y);
        let fz = lab_f(z / WHITE_Z);

        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

/// Convert an RGB sample to Lab.
#[inline]
pub fn to_lab(rgb: Rgb) -> Lab {
    Lab::from(rgb)
}
