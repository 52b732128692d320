use crate::foundation::error::{ZvisError, ZvisResult};

/// Absolute 0-based video frame index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> ZvisResult<Self> {
        if start.0 > end.0 {
            return Err(ZvisError::config("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

/// Integer video frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fps(u32);

impl Fps {
    /// Create a validated frame rate.
    pub fn new(fps: u32) -> ZvisResult<Self> {
        if fps == 0 {
            return Err(ZvisError::config("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    /// Frames per second.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Number of audio sample instants folded into one output unit when `units_per_frame` units
    /// are produced per video frame.
    ///
    /// Non-integral ratios are truncated. Returns a config error when the result is zero.
    pub fn sample_divisor(self, sample_rate: u32, units_per_frame: u32) -> ZvisResult<usize> {
        let per_sec = u64::from(self.0) * u64::from(units_per_frame);
        if per_sec == 0 {
            return Err(ZvisError::config("units per frame must be > 0"));
        }
        let divisor = u64::from(sample_rate) / per_sec;
        if divisor == 0 {
            return Err(ZvisError::config(format!(
                "sample rate {sample_rate} Hz is too low for {per_sec} output units per second"
            )));
        }
        Ok(divisor as usize)
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Dimensions of an existing image.
    pub fn of<I: image::GenericImageView>(img: &I) -> Self {
        let (width, height) = img.dimensions();
        Self { width, height }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
