use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::error::{ZvisError, ZvisResult};

/// Static properties of an audio stream, known once it is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamSpec {
    /// Sample instants per second.
    pub sample_rate: u32,
    /// Channel count, fixed for the whole stream (>= 1).
    pub channels: u16,
    /// Total number of sample instants (frames) in the stream.
    pub total_frames: u64,
}

/// Consecutive multi-channel sample instants, stored interleaved.
///
/// Amplitudes are normalised floats; integer PCM is scaled by `1 / 2^(bits-1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBlock {
    channels: u16,
    samples: Vec<f32>,
}

impl SampleBlock {
    /// Wrap interleaved samples. The length must be a multiple of `channels`.
    pub fn new(channels: u16, samples: Vec<f32>) -> ZvisResult<Self> {
        if channels == 0 {
            return Err(ZvisError::decode("sample block channel count must be > 0"));
        }
        if !samples.len().is_multiple_of(usize::from(channels)) {
            return Err(ZvisError::decode(format!(
                "sample block of {} values is not a whole number of {channels}-channel frames",
                samples.len()
            )));
        }
        Ok(Self { channels, samples })
    }

    /// Channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of sample instants in the block.
    pub fn len_frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    /// Return `true` when the block holds no sample instants.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Per-channel amplitudes of one sample instant.
    pub fn frame(&self, idx: usize) -> &[f32] {
        let ch = usize::from(self.channels);
        &self.samples[idx * ch..(idx + 1) * ch]
    }

    /// Amplitude of one channel at one sample instant.
    pub fn amplitude(&self, frame: usize, channel: u16) -> f32 {
        self.samples[frame * usize::from(self.channels) + usize::from(channel)]
    }

    /// Iterate sample instants in order.
    pub fn frames(&self) -> std::slice::ChunksExact<'_, f32> {
        self.samples.chunks_exact(usize::from(self.channels))
    }
}

/// Blocking, sequential source of PCM sample instants.
///
/// Implementations own their underlying handle; dropping the stream releases it.
pub trait AudioStream {
    /// Static stream properties.
    fn spec(&self) -> StreamSpec;

    /// Read up to `frames` consecutive sample instants.
    ///
    /// Returns fewer instants only at the end of the stream, and an empty block once the stream is
    /// exhausted.
    fn read_block(&mut self, frames: usize) -> ZvisResult<SampleBlock>;
}

#[derive(Clone, Copy, Debug)]
enum SampleDecode {
    Float,
    Int { scale: f32 },
}

/// WAV file stream backed by `hound`.
pub struct WavStream {
    path: PathBuf,
    reader: hound::WavReader<BufReader<File>>,
    spec: StreamSpec,
    decode: SampleDecode,
    pos: u64,
}

impl std::fmt::Debug for WavStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavStream")
            .field("path", &self.path)
            .field("spec", &self.spec)
            .field("pos", &self.pos)
            .finish()
    }
}

impl WavStream {
    /// Open a WAV file (integer PCM up to 32 bits, or 32-bit float).
    pub fn open(path: impl AsRef<Path>) -> ZvisResult<Self> {
        let path = path.as_ref();
        let reader = hound::WavReader::open(path).map_err(|e| {
            ZvisError::decode(format!(
                "failed to open audio file '{}': {e}",
                path.display()
            ))
        })?;

        let wav = reader.spec();
        if wav.channels == 0 {
            return Err(ZvisError::decode(format!(
                "audio file '{}' declares zero channels",
                path.display()
            )));
        }
        let decode = match wav.sample_format {
            hound::SampleFormat::Float => SampleDecode::Float,
            hound::SampleFormat::Int => {
                if wav.bits_per_sample == 0 || wav.bits_per_sample > 32 {
                    return Err(ZvisError::decode(format!(
                        "audio file '{}' has unsupported bit depth {}",
                        path.display(),
                        wav.bits_per_sample
                    )));
                }
                let full_scale = (1u64 << (wav.bits_per_sample - 1)) as f32;
                SampleDecode::Int {
                    scale: 1.0 / full_scale,
                }
            }
        };

        let spec = StreamSpec {
            sample_rate: wav.sample_rate,
            channels: wav.channels,
            total_frames: u64::from(reader.duration()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            spec,
            decode,
            pos: 0,
        })
    }

    /// Path the stream was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_error(path: &Path, e: hound::Error) -> ZvisError {
    ZvisError::decode(format!(
        "failed to read audio file '{}': {e}",
        path.display()
    ))
}

impl AudioStream for WavStream {
    fn spec(&self) -> StreamSpec {
        self.spec
    }

    fn read_block(&mut self, frames: usize) -> ZvisResult<SampleBlock> {
        let remaining = self.spec.total_frames.saturating_sub(self.pos);
        let n = (frames as u64).min(remaining) as usize;
        let want = n * usize::from(self.spec.channels);

        let mut samples = Vec::with_capacity(want);
        match self.decode {
            SampleDecode::Float => {
                for s in self.reader.samples::<f32>().take(want) {
                    samples.push(s.map_err(|e| read_error(&self.path, e))?);
                }
            }
            SampleDecode::Int { scale } => {
                for s in self.reader.samples::<i32>().take(want) {
                    let v = s.map_err(|e| read_error(&self.path, e))?;
                    samples.push(v as f32 * scale);
                }
            }
        }

        if samples.len() != want {
            return Err(ZvisError::decode(format!(
                "audio file '{}' ended after {} of {} sample frames",
                self.path.display(),
                self.pos + (samples.len() / usize::from(self.spec.channels)) as u64,
                self.spec.total_frames
            )));
        }

        self.pos += n as u64;
        SampleBlock::new(self.spec.channels, samples)
    }
}

/// In-memory interleaved stream, used for synthesized input and tests.
#[derive(Clone, Debug)]
pub struct MemoryStream {
    spec: StreamSpec,
    samples: Vec<f32>,
    pos: usize,
}

impl MemoryStream {
    /// Wrap interleaved samples. The length must be a multiple of `channels`.
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> ZvisResult<Self> {
        if channels == 0 {
            return Err(ZvisError::decode("memory stream channel count must be > 0"));
        }
        if !samples.len().is_multiple_of(usize::from(channels)) {
            return Err(ZvisError::decode(
                "memory stream length is not a whole number of frames",
            ));
        }
        let total_frames = (samples.len() / usize::from(channels)) as u64;
        Ok(Self {
            spec: StreamSpec {
                sample_rate,
                channels,
                total_frames,
            },
            samples,
            pos: 0,
        })
    }

    /// Mono stream.
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Self {
        let total_frames = samples.len() as u64;
        Self {
            spec: StreamSpec {
                sample_rate,
                channels: 1,
                total_frames,
            },
            samples,
            pos: 0,
        }
    }
}

impl AudioStream for MemoryStream {
    fn spec(&self) -> StreamSpec {
        self.spec
    }

    fn read_block(&mut self, frames: usize) -> ZvisResult<SampleBlock> {
        let ch = usize::from(self.spec.channels);
        let start = self.pos * ch;
        let end = start
            .saturating_add(frames.saturating_mul(ch))
            .min(self.samples.len());
        self.pos = end / ch;
        SampleBlock::new(self.spec.channels, self.samples[start..end].to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/stream.rs"]
mod tests;
