//! Audio-driven layers and the factory that picks a variant from section properties.

pub mod image;
pub mod spectro;

use std::path::{Path, PathBuf};

use ::image::RgbaImage;

use crate::config::document::Properties;
use crate::config::records::{ImageLayerConfig, SpectroLayerConfig, require};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ZvisError, ZvisResult};

pub use self::image::ImageLayer;
pub use self::spectro::SpectroLayer;

/// Shared inputs for loading any layer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerContext {
    /// Directory relative paths are resolved against.
    pub base_dir: PathBuf,
    /// Output frame rate.
    pub fps: Fps,
    /// Output canvas size, taken from the background.
    pub canvas: Canvas,
}

/// Layer variant tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Volume-driven still image.
    Image,
    /// Scrolling spectrogram.
    Spectro,
}

impl LayerKind {
    /// Signal keys checked in order; the first one present selects the variant.
    pub const SIGNALS: &'static [(&'static str, LayerKind)] =
        &[("image", LayerKind::Image), ("colour", LayerKind::Spectro)];

    /// Pick the variant for a section's properties.
    pub fn from_properties(section: &str, props: &Properties) -> ZvisResult<Self> {
        Self::SIGNALS
            .iter()
            .find(|(key, _)| props.contains_key(*key))
            .map(|(_, kind)| *kind)
            .ok_or_else(|| {
                ZvisError::config(format!(
                    "section [{section}]: unknown layer type (expected an 'image' or 'colour' key)"
                ))
            })
    }

    /// Short name used in log output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Spectro => "spectro",
        }
    }
}

/// One loaded layer.
#[derive(Clone, Debug)]
pub enum Layer {
    /// See [`ImageLayer`].
    Image(ImageLayer),
    /// See [`SpectroLayer`].
    Spectro(SpectroLayer),
}

impl Layer {
    /// Validate a section and load the layer it describes.
    pub fn load(ctx: &LayerContext, section: &str, props: &Properties) -> ZvisResult<Self> {
        let kind = LayerKind::from_properties(section, props)?;
        require(section, props, "audio")?;
        let layer = match kind {
            LayerKind::Image => {
                let cfg = ImageLayerConfig::from_properties(section, props, &ctx.base_dir)?;
                Self::Image(ImageLayer::load(ctx, section, &cfg)?)
            }
            LayerKind::Spectro => {
                let cfg = SpectroLayerConfig::from_properties(section, props, &ctx.base_dir)?;
                Self::Spectro(SpectroLayer::load(ctx, section, &cfg)?)
            }
        };
        tracing::info!(
            section,
            kind = kind.as_str(),
            audio = props.get("audio").map(String::as_str).unwrap_or_default(),
            frames = layer.dataset_len(),
            "layer prepared"
        );
        Ok(layer)
    }

    /// Variant tag of this layer.
    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Image(_) => LayerKind::Image,
            Self::Spectro(_) => LayerKind::Spectro,
        }
    }

    /// Length of the layer's dataset: volume points or spectral slices.
    pub fn dataset_len(&self) -> usize {
        match self {
            Self::Image(l) => l.len_frames(),
            Self::Spectro(l) => l.len_slices(),
        }
    }

    /// Paint the layer for `frame` onto `canvas`.
    pub fn draw(&self, canvas: &mut RgbaImage, frame: FrameIndex) {
        match self {
            Self::Image(l) => l.draw(canvas, frame),
            Self::Spectro(l) => l.draw(canvas, frame),
        }
    }
}

/// Decode an image file into straight-alpha RGBA8.
pub fn load_rgba(path: &Path) -> ZvisResult<RgbaImage> {
    ::image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| ZvisError::image(format!("failed to load '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/layer/mod.rs"]
mod tests;
