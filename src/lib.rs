//! zvis renders audio-driven visualisations as a sequence of still frames.
//!
//! A configuration names a background image, a frame rate and any number of layers. Each layer
//! analyses one audio file once, at load time, and then paints itself onto every frame:
//! [`ImageLayer`] fades a still image with the track's volume envelope and [`SpectroLayer`]
//! scrolls a baked spectrogram across the canvas.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod audio;
pub(crate) mod config;
pub(crate) mod effects;
pub(crate) mod encode;
pub(crate) mod layer;
pub(crate) mod session;

pub use audio::envelope::{DEFAULT_INERTIA, compute_volume_points, volume_points_from_path};
pub use audio::spectrogram::{compute_fft_points, fft_points_from_path};
pub use audio::stream::{AudioStream, MemoryStream, SampleBlock, StreamSpec, WavStream};
pub use config::document::{ConfigDocument, Properties};
pub use config::records::{GeneralConfig, ImageLayerConfig, SpectroLayerConfig};
pub use encode::jpeg::{JPEG_QUALITY, JpegDirSink, frame_file_name};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
pub use foundation::error::{ZvisError, ZvisResult};
pub use layer::{ImageLayer, Layer, LayerContext, LayerKind, SpectroLayer, load_rgba};
pub use session::{RenderOpts, RenderStats, Visualization};
