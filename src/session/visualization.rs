use std::path::Path;

use image::RgbaImage;
use rayon::prelude::*;

use crate::config::document::{ConfigDocument, Properties};
use crate::config::records::{GENERAL_SECTION, GeneralConfig};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
use crate::foundation::error::{ZvisError, ZvisResult};
use crate::layer::{Layer, LayerContext, load_rgba};

const MAX_REORDER_BUFFER_BYTES: u64 = 128 * 1024 * 1024;

/// Options controlling layer loading and range rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOpts {
    /// Load layers and render frames on a dedicated rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Frames rendered per parallel batch before they are handed to the sink.
    pub chunk_size: usize,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            chunk_size: 64,
        }
    }
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Total frames in the requested range.
    pub frames_total: u64,
    /// Frames rendered and pushed to the sink.
    pub frames_rendered: u64,
}

/// A loaded visualisation: background, frame rate and layers in draw order.
///
/// All audio analysis happens while loading; rendering only reads the prepared data, so frames can
/// be produced in any order and on any thread.
#[derive(Clone, Debug)]
pub struct Visualization {
    background: RgbaImage,
    fps: Fps,
    layers: Vec<(String, Layer)>,
}

impl Visualization {
    /// Assemble a visualisation from prepared parts. Layers are drawn in the given order.
    pub fn new(background: RgbaImage, fps: Fps, layers: Vec<(String, Layer)>) -> Self {
        Self {
            background,
            fps,
            layers,
        }
    }

    /// Load a configuration file. Relative paths resolve against the file's directory.
    #[tracing::instrument(skip(opts))]
    pub fn from_path(config: &Path, opts: &RenderOpts) -> ZvisResult<Self> {
        let doc = ConfigDocument::from_path(config)?;
        let base_dir = config.parent().unwrap_or_else(|| Path::new(""));
        Self::from_document(&doc, base_dir, opts)
    }

    /// Load the background and every layer section of `doc`.
    ///
    /// Layer sections are every section except `[general]`, in lexicographic order; later names are
    /// drawn on top.
    pub fn from_document(
        doc: &ConfigDocument,
        base_dir: &Path,
        opts: &RenderOpts,
    ) -> ZvisResult<Self> {
        let general = GeneralConfig::from_document(doc, base_dir)?;
        let background = load_rgba(&general.background)?;

        let sections: Vec<_> = doc
            .sections()
            .filter(|(name, _)| *name != GENERAL_SECTION)
            .collect();
        if sections.is_empty() {
            return Err(ZvisError::config(
                "no layer sections: add at least one section besides [general]",
            ));
        }

        let ctx = LayerContext {
            base_dir: base_dir.to_path_buf(),
            fps: general.fps,
            canvas: Canvas::of(&background),
        };
        let load = |&(name, props): &(&str, &Properties)| {
            Layer::load(&ctx, name, props).map(|layer| (name.to_string(), layer))
        };
        let layers = if opts.parallel {
            let pool = build_thread_pool(opts.threads)?;
            pool.install(|| sections.par_iter().map(load).collect::<ZvisResult<Vec<_>>>())?
        } else {
            sections.iter().map(load).collect::<ZvisResult<Vec<_>>>()?
        };

        Ok(Self::new(background, general.fps, layers))
    }

    /// Output frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Output size, taken from the background.
    pub fn canvas(&self) -> Canvas {
        Canvas::of(&self.background)
    }

    /// Background every frame starts from.
    pub fn background(&self) -> &RgbaImage {
        &self.background
    }

    /// Layers in draw order with their section names.
    pub fn layers(&self) -> &[(String, Layer)] {
        &self.layers
    }

    /// Number of output frames: the dataset length of the first layer.
    pub fn frame_count(&self) -> u64 {
        self.layers
            .first()
            .map_or(0, |(_, layer)| layer.dataset_len() as u64)
    }

    /// Composite one frame: the background with every layer drawn over it in order.
    pub fn render_frame(&self, frame: FrameIndex) -> RgbaImage {
        let mut canvas = self.background.clone();
        for (_, layer) in &self.layers {
            layer.draw(&mut canvas, frame);
        }
        canvas
    }

    /// Render a frame range and stream frames into a sink.
    ///
    /// The sink receives frames in strictly increasing frame index order. When `parallel` is
    /// enabled, each chunk is rendered on the pool and reassembled by index before pushing.
    #[tracing::instrument(skip(self, range, sink, opts), fields(start = range.start.0, end = range.end.0))]
    pub fn render_range(
        &self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
        opts: &RenderOpts,
    ) -> ZvisResult<RenderStats> {
        if range.is_empty() {
            return Err(ZvisError::config("render range must be non-empty"));
        }
        let total = self.frame_count();
        if range.end.0 > total {
            return Err(ZvisError::config(format!(
                "render range {}..{} exceeds the frame count {total}",
                range.start.0, range.end.0
            )));
        }

        let canvas = self.canvas();
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.fps,
        })?;
        tracing::info!(
            frames = range.len_frames(),
            layers = self.layers.len(),
            parallel = opts.parallel,
            "render started"
        );

        let mut stats = RenderStats {
            frames_total: range.len_frames(),
            frames_rendered: 0,
        };

        if opts.parallel {
            let pool = build_thread_pool(opts.threads)?;
            let bytes_per_frame = u64::from(canvas.width)
                .saturating_mul(u64::from(canvas.height))
                .saturating_mul(4)
                .max(1);
            let max_chunk_by_mem = (MAX_REORDER_BUFFER_BYTES / bytes_per_frame).max(1);
            let chunk_size = normalized_chunk_size(opts.chunk_size).min(max_chunk_by_mem);

            let mut chunk_start = range.start.0;
            while chunk_start < range.end.0 {
                let chunk_end = chunk_start.saturating_add(chunk_size).min(range.end.0);
                let len = (chunk_end - chunk_start) as usize;
                let frames: Vec<RgbaImage> = pool.install(|| {
                    (0..len)
                        .into_par_iter()
                        .map(|k| self.render_frame(FrameIndex(chunk_start + k as u64)))
                        .collect()
                });
                for (f, frame) in (chunk_start..chunk_end).zip(frames.iter()) {
                    sink.push_frame(FrameIndex(f), frame)?;
                    stats.frames_rendered += 1;
                }
                chunk_start = chunk_end;
            }
        } else {
            for f in range.start.0..range.end.0 {
                let frame = self.render_frame(FrameIndex(f));
                sink.push_frame(FrameIndex(f), &frame)?;
                stats.frames_rendered += 1;
            }
        }

        sink.end()?;
        tracing::info!(frames = stats.frames_rendered, "render finished");
        Ok(stats)
    }

    /// Render every frame. A visualisation with no frames opens and closes the sink only.
    pub fn render_all(&self, sink: &mut dyn FrameSink, opts: &RenderOpts) -> ZvisResult<RenderStats> {
        let total = self.frame_count();
        if total == 0 {
            let canvas = self.canvas();
            sink.begin(SinkConfig {
                width: canvas.width,
                height: canvas.height,
                fps: self.fps,
            })?;
            sink.end()?;
            tracing::warn!("first layer has no data; no frames rendered");
            return Ok(RenderStats::default());
        }
        self.render_range(FrameRange::new(FrameIndex(0), FrameIndex(total))?, sink, opts)
    }
}

fn build_thread_pool(threads: Option<usize>) -> ZvisResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ZvisError::config("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ZvisError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/visualization.rs"]
mod tests;
