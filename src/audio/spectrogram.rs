//! Block-wise Fourier analysis producing one spectrum per time slice.

use std::path::Path;

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::audio::stream::{AudioStream, SampleBlock, WavStream};
use crate::foundation::core::Fps;
use crate::foundation::error::{ZvisError, ZvisResult};

/// Compute `rate` spectra per video frame over the whole of `stream`.
///
/// Each slice covers `sample_rate / (rate * fps)` sample instants (the last one may be shorter),
/// downmixed to mono by channel averaging. A spectrum holds the real part of the first
/// `fft_height` bins of the slice's unwindowed DFT, zero-filled past the transform length. Values
/// are not normalised.
pub fn compute_fft_points(
    stream: &mut dyn AudioStream,
    fps: Fps,
    fft_height: usize,
    rate: u32,
) -> ZvisResult<Vec<Vec<f32>>> {
    if fft_height == 0 {
        return Err(ZvisError::config("spectrogram height must be > 0"));
    }
    if rate == 0 {
        return Err(ZvisError::config("spectrogram rate must be > 0"));
    }

    let spec = stream.spec();
    let divisor = fps.sample_divisor(spec.sample_rate, rate)?;
    let slices = spec.total_frames.div_ceil(divisor as u64) as usize;

    let mut planner = FftPlanner::<f32>::new();
    let mut points = Vec::with_capacity(slices);
    let mut buf = Vec::<Complex<f32>>::with_capacity(divisor);

    loop {
        let block = stream.read_block(divisor)?;
        if block.is_empty() {
            break;
        }
        downmix_into(&block, &mut buf);
        planner.plan_fft_forward(buf.len()).process(&mut buf);

        let spectrum = (0..fft_height)
            .map(|bin| buf.get(bin).map_or(0.0, |c| c.re))
            .collect();
        points.push(spectrum);
    }

    Ok(points)
}

/// Open `path` and compute its spectrogram.
#[tracing::instrument(level = "debug")]
pub fn fft_points_from_path(
    path: &Path,
    fps: Fps,
    fft_height: usize,
    rate: u32,
) -> ZvisResult<Vec<Vec<f32>>> {
    let mut stream = WavStream::open(path)?;
    compute_fft_points(&mut stream, fps, fft_height, rate)
}

fn downmix_into(block: &SampleBlock, out: &mut Vec<Complex<f32>>) {
    let inv = 1.0 / f32::from(block.channels());
    out.clear();
    out.extend(
        block
            .frames()
            .map(|frame| Complex::new(frame.iter().sum::<f32>() * inv, 0.0)),
    );
}

#[cfg(test)]
#[path = "../../tests/unit/audio/spectrogram.rs"]
mod tests;
