use image::{Rgba, RgbaImage, imageops};

use crate::audio::spectrogram::fft_points_from_path;
use crate::config::records::SpectroLayerConfig;
use crate::effects::composite::{paste_alpha_masked, spectro_alpha};
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{ZvisError, ZvisResult};
use crate::layer::LayerContext;

/// Scrolling spectrogram baked into one wide image and windowed per frame.
///
/// The baked image is `slices + canvas_width / 2` columns wide, so the first slice enters at the
/// horizontal centre of frame 0. Row `canvas_height - 1 - y` holds bin `y / yscale`, which puts
/// low frequencies at the bottom.
#[derive(Clone, Debug)]
pub struct SpectroLayer {
    baked: RgbaImage,
    canvas: Canvas,
    slices: usize,
    rate: u32,
    yscale: u32,
}

impl SpectroLayer {
    /// Analyse the layer's audio and bake its spectrogram.
    #[tracing::instrument(skip(ctx, cfg), fields(audio = %cfg.audio.display()))]
    pub fn load(ctx: &LayerContext, section: &str, cfg: &SpectroLayerConfig) -> ZvisResult<Self> {
        let fft_height = fft_height(section, ctx.canvas, cfg.yscale)?;
        let spectra = fft_points_from_path(&cfg.audio, ctx.fps, fft_height, cfg.rate)?;
        Self::bake(section, ctx.canvas, &spectra, cfg.colour, cfg.rate, cfg.yscale)
    }

    /// Bake already computed spectra into the layer image.
    pub fn bake(
        section: &str,
        canvas: Canvas,
        spectra: &[Vec<f32>],
        colour: [u8; 3],
        rate: u32,
        yscale: u32,
    ) -> ZvisResult<Self> {
        if rate == 0 {
            return Err(ZvisError::config(format!(
                "section [{section}]: rate must be > 0"
            )));
        }
        fft_height(section, canvas, yscale)?;

        let half = canvas.width / 2;
        let width = u32::try_from(spectra.len())
            .ok()
            .and_then(|n| n.checked_add(half))
            .ok_or_else(|| {
                ZvisError::image(format!(
                    "section [{section}]: spectrogram of {} slices is too wide",
                    spectra.len()
                ))
            })?;

        let [r, g, b] = colour;
        let mut baked = RgbaImage::new(width, canvas.height);
        for (pos, spectrum) in spectra.iter().enumerate() {
            let x = pos as u32 + half;
            for y in 0..canvas.height {
                let bin = (y / yscale) as usize;
                let value = spectrum.get(bin).copied().unwrap_or(0.0);
                baked.put_pixel(
                    x,
                    canvas.height - 1 - y,
                    Rgba([r, g, b, spectro_alpha(value)]),
                );
            }
        }

        Ok(Self {
            baked,
            canvas,
            slices: spectra.len(),
            rate,
            yscale,
        })
    }

    /// Number of spectral slices baked into the layer.
    pub fn len_slices(&self) -> usize {
        self.slices
    }

    /// Slices scrolled per frame.
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Vertical pixels per frequency bin.
    pub fn yscale(&self) -> u32 {
        self.yscale
    }

    /// The full baked spectrogram image.
    pub fn baked(&self) -> &RgbaImage {
        &self.baked
    }

    /// First baked column shown in `frame`.
    pub fn crop_offset(&self, frame: FrameIndex) -> u64 {
        u64::from(self.rate).saturating_mul(frame.0)
    }

    /// Paste the frame's window of the baked image over the canvas using its own alpha.
    pub fn draw(&self, canvas: &mut RgbaImage, frame: FrameIndex) {
        let offset = self.crop_offset(frame);
        let Ok(x) = u32::try_from(offset) else {
            return;
        };
        if x >= self.baked.width() {
            return;
        }
        // crop_imm clamps to the baked bounds; the missing right-hand columns stay untouched.
        let window = imageops::crop_imm(&self.baked, x, 0, self.canvas.width, self.canvas.height);
        paste_alpha_masked(canvas, &*window, (0, 0));
    }
}

fn fft_height(section: &str, canvas: Canvas, yscale: u32) -> ZvisResult<usize> {
    if yscale == 0 {
        return Err(ZvisError::config(format!(
            "section [{section}]: yscale must be > 0"
        )));
    }
    match canvas.height / yscale {
        0 => Err(ZvisError::config(format!(
            "section [{section}]: yscale {yscale} exceeds the canvas height {}",
            canvas.height
        ))),
        h => Ok(h as usize),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/spectro.rs"]
mod tests;
