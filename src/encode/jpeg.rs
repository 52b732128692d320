//! Directory of numbered JPEG stills.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::buffer::ConvertBuffer;
use image::{RgbImage, RgbaImage};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ZvisError, ZvisResult};

/// Encoder quality used for every frame.
pub const JPEG_QUALITY: u8 = 100;

/// File name of frame `idx`: `frame` followed by the zero-padded index.
pub fn frame_file_name(idx: FrameIndex) -> String {
    format!("frame{:06}.jpg", idx.0)
}

/// Writes each pushed frame to `<dir>/frameNNNNNN.jpg`, dropping the alpha channel.
#[derive(Debug)]
pub struct JpegDirSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    written: u64,
}

impl JpegDirSink {
    /// Sink writing into `dir`, which is created on `begin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            written: 0,
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Frames written since the last `begin`.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for JpegDirSink {
    fn begin(&mut self, cfg: SinkConfig) -> ZvisResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            ZvisError::io(format!(
                "failed to create output dir '{}': {e}",
                self.dir.display()
            ))
        })?;
        self.cfg = Some(cfg);
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbaImage) -> ZvisResult<()> {
        if let Some(cfg) = &self.cfg
            && (cfg.width, cfg.height) != frame.dimensions()
        {
            return Err(ZvisError::image(format!(
                "frame {} is {}x{}, sink expects {}x{}",
                idx.0,
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }

        let path = self.dir.join(frame_file_name(idx));
        write_jpeg(&path, frame)?;
        self.written += 1;
        tracing::debug!(frame = idx.0, path = %path.display(), "wrote frame");
        Ok(())
    }

    fn end(&mut self) -> ZvisResult<()> {
        Ok(())
    }
}

/// Encode `frame` as an RGB JPEG at [`JPEG_QUALITY`].
pub fn write_jpeg(path: &Path, frame: &RgbaImage) -> ZvisResult<()> {
    let file = File::create(path)
        .map_err(|e| ZvisError::io(format!("failed to create '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    let rgb: RgbImage = frame.convert();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| ZvisError::image(format!("failed to encode '{}': {e}", path.display())))?;
    out.flush()
        .map_err(|e| ZvisError::io(format!("failed to write '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/jpeg.rs"]
mod tests;
