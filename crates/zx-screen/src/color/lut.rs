//! Gamma decode lookup generated by build.rs.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Convert an sRGB fraction (0.0..=1.0) to linear light using the LUT with
/// linear interpolation between neighbouring entries.
#[inline]
pub fn srgb_to_linear(srgb: f32) -> f32 {
    let srgb = srgb.clamp(0.0, 1.0);

    let scaled = srgb * 4095.0;
    let index = scaled as usize;
    if index >= 4095 {
        return SRGB_TO_LINEAR[4095];
    }

    let frac = scaled - index as f32;
    let a = SRGB_TO_LINEAR[index];
    let b = SRGB_TO_LINEAR[index + 1];
    a + (b - a) * frac
}
