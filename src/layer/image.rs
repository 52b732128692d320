use image::{GrayImage, RgbaImage};

use crate::audio::envelope::volume_points_from_path;
use crate::config::records::ImageLayerConfig;
use crate::effects::composite::{image_layer_stencil, paste_with_stencil};
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{ZvisError, ZvisResult};
use crate::layer::{LayerContext, load_rgba};

/// Still image whose opacity follows the loudness of an audio track.
#[derive(Clone, Debug)]
pub struct ImageLayer {
    source: RgbaImage,
    zero_alpha_mask: GrayImage,
    volume: Vec<f32>,
}

impl ImageLayer {
    /// Decode the image and compute the volume envelope of the layer's audio.
    #[tracing::instrument(skip(ctx, cfg), fields(audio = %cfg.audio.display()))]
    pub fn load(ctx: &LayerContext, section: &str, cfg: &ImageLayerConfig) -> ZvisResult<Self> {
        let source = load_rgba(&cfg.image)?;
        let volume = volume_points_from_path(&cfg.audio, ctx.fps, cfg.inertia)?;
        Self::from_parts(section, source, ctx.canvas, volume)
    }

    /// Assemble a layer from an already decoded image and volume sequence.
    pub fn from_parts(
        section: &str,
        source: RgbaImage,
        canvas: Canvas,
        volume: Vec<f32>,
    ) -> ZvisResult<Self> {
        if Canvas::of(&source) != canvas {
            return Err(ZvisError::image(format!(
                "section [{section}]: image is {}x{} but the background is {}x{}",
                source.width(),
                source.height(),
                canvas.width,
                canvas.height
            )));
        }
        Ok(Self {
            source,
            zero_alpha_mask: GrayImage::new(canvas.width, canvas.height),
            volume,
        })
    }

    /// Per-frame volume values in `[0, 1]`.
    pub fn volume(&self) -> &[f32] {
        &self.volume
    }

    /// Number of frames this layer has data for.
    pub fn len_frames(&self) -> usize {
        self.volume.len()
    }

    /// Paste the image through its volume-scaled stencil. Frames past the end draw nothing.
    pub fn draw(&self, canvas: &mut RgbaImage, frame: FrameIndex) {
        let Some(&v) = usize::try_from(frame.0)
            .ok()
            .and_then(|i| self.volume.get(i))
        else {
            return;
        };
        let stencil = image_layer_stencil(&self.zero_alpha_mask, &self.source, v);
        paste_with_stencil(canvas, &self.source, &stencil, (0, 0));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/image.rs"]
mod tests;
