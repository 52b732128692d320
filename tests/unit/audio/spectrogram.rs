use super::*;
use crate::audio::stream::MemoryStream;

fn fps(n: u32) -> Fps {
    Fps::new(n).unwrap()
}

#[test]
fn slice_count_is_ceil_of_total_over_divisor() {
    let mut s = MemoryStream::mono(1_000, vec![0.0; 1_050]);
    let points = compute_fft_points(&mut s, fps(10), 16, 1).unwrap();
    assert_eq!(points.len(), 11);
    assert!(points.iter().all(|p| p.len() == 16));

    let mut s = MemoryStream::mono(1_000, vec![0.0; 1_050]);
    let points = compute_fft_points(&mut s, fps(10), 16, 2).unwrap();
    assert_eq!(points.len(), 21);
}

#[test]
fn short_final_block_is_zero_filled() {
    let mut s = MemoryStream::mono(1_000, vec![0.5; 150]);
    let points = compute_fft_points(&mut s, fps(10), 80, 1).unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[1].len(), 80);
    // 50-point transform: bins 50.. do not exist.
    assert!(points[1][50..].iter().all(|&v| v == 0.0));
    assert!((points[1][0] - 25.0).abs() < 1e-3);
}

#[test]
fn constant_block_puts_everything_in_dc_bin() {
    let mut s = MemoryStream::mono(1_000, vec![0.5; 100]);
    let points = compute_fft_points(&mut s, fps(10), 8, 1).unwrap();
    assert_eq!(points.len(), 1);
    assert!((points[0][0] - 50.0).abs() < 1e-3);
    assert!(points[0][1..].iter().all(|v| v.abs() < 1e-3));
}

#[test]
fn cosine_lands_in_its_bin_unnormalised() {
    let n = 100usize;
    let samples: Vec<f32> = (0..n)
        .map(|i| (2.0 * std::f32::consts::PI * 5.0 * i as f32 / n as f32).cos())
        .collect();
    let mut s = MemoryStream::mono(1_000, samples);
    let points = compute_fft_points(&mut s, fps(10), 10, 1).unwrap();
    assert!((points[0][5] - 50.0).abs() < 1e-2);
    assert!(points[0][3].abs() < 1e-2);
}

#[test]
fn channels_are_averaged_before_transform() {
    let mut samples = Vec::new();
    for _ in 0..100 {
        samples.extend([1.0f32, 0.0]);
    }
    let mut s = MemoryStream::new(1_000, 2, samples).unwrap();
    let points = compute_fft_points(&mut s, fps(10), 4, 1).unwrap();
    assert!((points[0][0] - 50.0).abs() < 1e-3);
}

#[test]
fn slices_follow_stream_order() {
    let mut samples = vec![0.0f32; 100];
    samples.extend(vec![1.0f32; 100]);
    let mut s = MemoryStream::mono(1_000, samples);
    let points = compute_fft_points(&mut s, fps(10), 1, 1).unwrap();
    assert_eq!(points.len(), 2);
    assert!(points[0][0].abs() < 1e-6);
    assert!((points[1][0] - 100.0).abs() < 1e-3);
}

#[test]
fn empty_stream_has_no_slices() {
    let mut s = MemoryStream::mono(1_000, vec![]);
    assert!(compute_fft_points(&mut s, fps(10), 4, 1).unwrap().is_empty());
}

#[test]
fn invalid_parameters_are_config_errors() {
    let mut s = MemoryStream::mono(1_000, vec![0.0; 10]);
    assert!(matches!(
        compute_fft_points(&mut s, fps(10), 0, 1),
        Err(ZvisError::Config(_))
    ));
    assert!(matches!(
        compute_fft_points(&mut s, fps(10), 4, 0),
        Err(ZvisError::Config(_))
    ));
    let mut s = MemoryStream::mono(30, vec![0.0; 10]);
    assert!(matches!(
        compute_fft_points(&mut s, fps(25), 4, 2),
        Err(ZvisError::Config(_))
    ));
}
