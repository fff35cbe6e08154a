use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{RingburstError, RingburstResult};
use crate::render::backend::FrameRGBA;

/// Configuration handed to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Integer frame rate of the stream.
    pub fps: u32,
    /// Number of frames that will be pushed.
    pub frame_count: u64,
}

impl SinkConfig {
    /// Canvas described by this config.
    pub fn canvas(&self) -> RingburstResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    pub(crate) fn check_frame(&self, frame: &FrameRGBA) -> RingburstResult<()> {
        if frame.width != self.width || frame.height != self.height {
            return Err(RingburstError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if frame.data.len() != expected {
            return Err(RingburstError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        Ok(())
    }
}

/// Consumer of overlay frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing [`FrameIndex`] order, between
/// exactly one `begin` and one `end`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> RingburstResult<()>;
    /// Push one frame. May block until the consumer has room for it.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> RingburstResult<()>;
    /// Called once after the last frame is pushed; finalizes the output.
    fn end(&mut self) -> RingburstResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called after the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> RingburstResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> RingburstResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| RingburstError::encoder("in-memory sink not started"))?;
        cfg.check_frame(frame)?;
        if let Some((last, _)) = self.frames.last()
            && idx.0 <= last.0
        {
            return Err(RingburstError::encoder("sink received out-of-order frame index"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> RingburstResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
