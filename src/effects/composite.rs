//! Stencil compositing on straight-alpha RGBA8 canvases.
//!
//! A paste replaces every channel, alpha included, with `dst + (src - dst) * stencil / 255`.
//! Pixels falling outside the destination are clipped.

use image::{GenericImageView, GrayImage, Rgba, RgbaImage};

use crate::foundation::math::{clamp_alpha_round, clamp_alpha_trunc, lerp_div255_u8};

/// Blend one pixel through a stencil value.
pub fn blend_px(dst: Rgba<u8>, src: Rgba<u8>, stencil: u8) -> Rgba<u8> {
    match stencil {
        0 => dst,
        255 => src,
        m => Rgba(std::array::from_fn(|c| lerp_div255_u8(dst[c], src[c], m))),
    }
}

/// Paste `src` onto `dst` at `origin` through an explicit alpha `stencil`.
///
/// The stencil is read at the source's coordinates; source pixels outside the stencil are skipped.
pub fn paste_with_stencil<I>(dst: &mut RgbaImage, src: &I, stencil: &GrayImage, origin: (u32, u32))
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let (ox, oy) = origin;
    for (x, y, px) in src.pixels() {
        let Some(m) = stencil.get_pixel_checked(x, y) else {
            continue;
        };
        let (Some(dx), Some(dy)) = (ox.checked_add(x), oy.checked_add(y)) else {
            continue;
        };
        if let Some(d) = dst.get_pixel_mut_checked(dx, dy) {
            *d = blend_px(*d, px, m.0[0]);
        }
    }
}

/// Paste `src` onto `dst` at `origin` using the source's own alpha channel as the stencil.
pub fn paste_alpha_masked<I>(dst: &mut RgbaImage, src: &I, origin: (u32, u32))
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let (ox, oy) = origin;
    for (x, y, px) in src.pixels() {
        let (Some(dx), Some(dy)) = (ox.checked_add(x), oy.checked_add(y)) else {
            continue;
        };
        if let Some(d) = dst.get_pixel_mut_checked(dx, dy) {
            *d = blend_px(*d, px, px[3]);
        }
    }
}

/// Stencil alpha of a volume-driven image layer at one pixel.
///
/// Silent frames (`volume <= 0`) keep the mask alpha. Otherwise the source alpha is scaled by the
/// reciprocal of the volume, added to the mask alpha and clamped.
pub fn image_layer_alpha(mask_alpha: u8, src_alpha: u8, volume: f32) -> u8 {
    if volume.is_nan() || volume <= 0.0 {
        return mask_alpha;
    }
    clamp_alpha_round(f32::from(mask_alpha) + f32::from(src_alpha) * (1.0 / volume))
}

/// Build the full stencil of an image layer for one volume value.
pub fn image_layer_stencil(mask: &GrayImage, src: &RgbaImage, volume: f32) -> GrayImage {
    let mut out = mask.clone();
    if volume.is_nan() || volume <= 0.0 {
        return out;
    }
    for (o, s) in out.pixels_mut().zip(src.pixels()) {
        o.0[0] = image_layer_alpha(o.0[0], s[3], volume);
    }
    out
}

/// Alpha of one spectrogram cell: `255 * value^2 / 160`, truncated and clamped.
pub fn spectro_alpha(value: f32) -> u8 {
    clamp_alpha_trunc(255.0 * value * value / 160.0)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
