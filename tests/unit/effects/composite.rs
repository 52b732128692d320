use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(px))
}

#[test]
fn blend_px_endpoints_and_midpoint() {
    let dst = Rgba([0, 0, 0, 0]);
    let src = Rgba([200, 100, 50, 255]);
    assert_eq!(blend_px(dst, src, 0), dst);
    assert_eq!(blend_px(dst, src, 255), src);
    assert_eq!(blend_px(dst, src, 128), Rgba([100, 50, 25, 128]));
}

#[test]
fn stencil_paste_blends_alpha_channel_too() {
    let mut dst = solid(2, 1, [10, 20, 30, 255]);
    let src = solid(2, 1, [110, 120, 130, 0]);
    let mut stencil = GrayImage::new(2, 1);
    stencil.put_pixel(1, 0, image::Luma([255]));
    paste_with_stencil(&mut dst, &src, &stencil, (0, 0));
    assert_eq!(*dst.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    assert_eq!(*dst.get_pixel(1, 0), Rgba([110, 120, 130, 0]));
}

#[test]
fn alpha_masked_paste_clips_at_destination_edge() {
    let mut dst = solid(3, 3, [0, 0, 0, 255]);
    let src = solid(2, 2, [255, 255, 255, 255]);
    paste_alpha_masked(&mut dst, &src, (2, 2));
    assert_eq!(*dst.get_pixel(2, 2), Rgba([255, 255, 255, 255]));
    assert_eq!(*dst.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
}

#[test]
fn alpha_masked_paste_skips_transparent_source() {
    let mut dst = solid(1, 1, [5, 6, 7, 255]);
    let src = solid(1, 1, [200, 200, 200, 0]);
    paste_alpha_masked(&mut dst, &src, (0, 0));
    assert_eq!(*dst.get_pixel(0, 0), Rgba([5, 6, 7, 255]));
}

#[test]
fn image_layer_alpha_follows_inverse_volume() {
    assert_eq!(image_layer_alpha(0, 200, 0.0), 0);
    assert_eq!(image_layer_alpha(0, 200, -1.0), 0);
    assert_eq!(image_layer_alpha(0, 200, f32::NAN), 0);
    assert_eq!(image_layer_alpha(0, 100, 1.0), 100);
    assert_eq!(image_layer_alpha(0, 100, 0.5), 200);
    assert_eq!(image_layer_alpha(0, 100, 0.25), 255);
    assert_eq!(image_layer_alpha(0, 0, 0.1), 0);
}

#[test]
fn image_layer_stencil_leaves_mask_for_silence() {
    let mask = GrayImage::new(2, 2);
    let src = solid(2, 2, [1, 2, 3, 80]);
    assert_eq!(image_layer_stencil(&mask, &src, 0.0), mask);
    let loud = image_layer_stencil(&mask, &src, 1.0);
    assert!(loud.pixels().all(|p| p.0[0] == 80));
}

#[test]
fn spectro_alpha_is_quadratic_and_saturates() {
    assert_eq!(spectro_alpha(0.0), 0);
    assert_eq!(spectro_alpha(1.0), 1);
    assert_eq!(spectro_alpha(-4.0), 25);
    assert_eq!(spectro_alpha(8.0), 102);
    assert_eq!(spectro_alpha(100.0), 255);
    assert_eq!(spectro_alpha(f32::NAN), 0);
}
