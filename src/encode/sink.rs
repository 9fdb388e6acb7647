use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{GlitchwaveError, GlitchwaveResult};
use crate::render::surface::FrameRGBA;

/// Output geometry handed to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
}

impl SinkConfig {
    pub(crate) fn frame_bytes(self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Reject frames whose size differs from the configured output.
    pub(crate) fn check_frame(self, frame: &FrameRGBA) -> GlitchwaveResult<()> {
        if frame.width != self.width || frame.height != self.height {
            return Err(GlitchwaveError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        if frame.data.len() != self.frame_bytes() {
            return Err(GlitchwaveError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        Ok(())
    }
}

/// Consumer of rendered frames.
///
/// `push_frame` is called in strictly increasing `FrameIndex` order between one `begin` and one
/// `end`.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> GlitchwaveResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> GlitchwaveResult<()>;
    fn end(&mut self) -> GlitchwaveResult<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn begin(&mut self, cfg: SinkConfig) -> GlitchwaveResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> GlitchwaveResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn end(&mut self) -> GlitchwaveResult<()> {
        (**self).end()
    }
}

/// Tracks the last pushed index so sinks can refuse out-of-order frames.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct FrameOrder {
    last: Option<FrameIndex>,
}

impl FrameOrder {
    pub(crate) fn reset(&mut self) {
        self.last = None;
    }

    pub(crate) fn advance(&mut self, idx: FrameIndex) -> GlitchwaveResult<()> {
        if let Some(last) = self.last
            && idx <= last
        {
            return Err(GlitchwaveError::encode(format!(
                "out-of-order frame {} after {}",
                idx.0, last.0
            )));
        }
        self.last = Some(idx);
        Ok(())
    }
}

/// Keeps every frame in memory; for tests and small previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    order: FrameOrder,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<(FrameIndex, FrameRGBA)> {
        self.frames
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> GlitchwaveResult<()> {
        self.cfg = Some(cfg);
        self.order.reset();
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> GlitchwaveResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| GlitchwaveError::encode("in-memory sink not started"))?;
        cfg.check_frame(frame)?;
        self.order.advance(idx)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> GlitchwaveResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
