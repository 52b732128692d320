//! Peak-hold envelope follower producing one loudness value per video frame.

use std::path::Path;

use crate::audio::stream::{AudioStream, WavStream};
use crate::foundation::core::Fps;
use crate::foundation::error::{ZvisError, ZvisResult};

/// Default envelope leak time constant in seconds.
pub const DEFAULT_INERTIA: f32 = 0.03;

const READ_BLOCK_FRAMES: usize = 1024;

/// Compute the normalised per-frame volume sequence of `stream`.
///
/// The follower decays by `k = 1 - 1/(inertia * sample_rate)` every sample instant and jumps to the
/// instant's peak channel amplitude when that is louder. The value at every instant whose index is
/// a multiple of `sample_rate / fps` becomes one output point; a trailing partial video frame
/// produces no point. The sequence is then min-max normalised over the whole track, or zeroed when
/// it has no dynamic range.
pub fn compute_volume_points(
    stream: &mut dyn AudioStream,
    fps: Fps,
    inertia: f32,
) -> ZvisResult<Vec<f32>> {
    if !inertia.is_finite() || inertia <= 0.0 {
        return Err(ZvisError::config(format!(
            "envelope inertia must be a positive number, got {inertia}"
        )));
    }

    let spec = stream.spec();
    let divisor = fps.sample_divisor(spec.sample_rate, 1)?;
    let frames = spec.total_frames / divisor as u64;

    let k = 1.0 - 1.0 / (f64::from(inertia) * f64::from(spec.sample_rate));
    let mut vol = 0.0f64;
    let mut pos = 0u64;
    let mut points = Vec::with_capacity(frames as usize);

    while pos < spec.total_frames {
        let block = stream.read_block(READ_BLOCK_FRAMES)?;
        if block.is_empty() {
            break;
        }
        for frame in block.frames() {
            vol *= k;
            let loudest = peak_amplitude(frame);
            if loudest > vol {
                vol = loudest;
            }
            if pos.is_multiple_of(divisor as u64) && (points.len() as u64) < frames {
                points.push(vol as f32);
            }
            pos += 1;
        }
    }

    normalize_min_max(&mut points);
    Ok(points)
}

/// Open `path` and compute its volume sequence.
#[tracing::instrument(level = "debug")]
pub fn volume_points_from_path(
    path: &Path,
    fps: Fps,
    inertia: f32,
) -> ZvisResult<Vec<f32>> {
    let mut stream = WavStream::open(path)?;
    compute_volume_points(&mut stream, fps, inertia)
}

fn peak_amplitude(frame: &[f32]) -> f64 {
    frame
        .iter()
        .map(|s| f64::from(s.abs()))
        .fold(0.0f64, f64::max)
}

/// Global min-max normalisation into `[0, 1]`; all zeros when every value is equal.
pub(crate) fn normalize_min_max(points: &mut [f32]) {
    let (min, max) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if min < max {
        let range = max - min;
        for v in points.iter_mut() {
            *v = ((*v - min) / range).clamp(0.0, 1.0);
        }
    } else {
        points.fill(0.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/envelope.rs"]
mod tests;
