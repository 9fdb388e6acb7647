use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::{FrameOrder, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{GlitchwaveError, GlitchwaveResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::surface::FrameRGBA;

/// File name used for frame `idx` in a PNG sequence.
pub fn frame_file_name(idx: FrameIndex) -> String {
    format!("frame_{:05}.png", idx.0)
}

/// Write `frame` as a straight-alpha RGBA PNG.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> GlitchwaveResult<()> {
    let mut rgba = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut rgba);
    }
    image::save_buffer_with_format(
        path,
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Writes one `frame_00000.png` per frame into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    order: FrameOrder,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            order: FrameOrder::default(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written since the last `begin`, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> GlitchwaveResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(GlitchwaveError::validation(
                "png sink width/height must be non-zero",
            ));
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output directory '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.order.reset();
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> GlitchwaveResult<()> {
        if self.cfg.is_none() {
            return Err(GlitchwaveError::encode("png sink not started"));
        }
        // Each file carries its own size, so frames after a resize are fine.
        if frame.data.len() != frame.width as usize * frame.height as usize * 4 {
            return Err(GlitchwaveError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        self.order.advance(idx)?;
        if frame.width == 0 || frame.height == 0 {
            tracing::debug!(frame = idx.0, "skipping empty frame");
            return Ok(());
        }
        let path = self.dir.join(frame_file_name(idx));
        write_png(&path, frame)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> GlitchwaveResult<()> {
        if self.cfg.take().is_none() {
            return Err(GlitchwaveError::encode("png sink not started"));
        }
        tracing::debug!(
            frames = self.written.len(),
            dir = %self.dir.display(),
            "png sequence written"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
