/// Linear interpolation `dst + (src - dst) * mask / 255` with round-to-nearest.
pub(crate) fn lerp_div255_u8(dst: u8, src: u8, mask: u8) -> u8 {
    let m = u32::from(mask);
    let v = u32::from(dst) * (255 - m) + u32::from(src) * m;
    ((v + 127) / 255) as u8
}

/// Clamp a float into the `u8` alpha range, truncating the fraction. NaN maps to 0.
pub(crate) fn clamp_alpha_trunc(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// Clamp a float into the `u8` alpha range, rounding to nearest. NaN maps to 0.
pub(crate) fn clamp_alpha_round(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
