use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::DepthloopResult;
use crate::render::raster::FrameRGBA;
use std::sync::{Arc, Mutex, PoisonError};

/// Configuration provided to a [`FrameSink`] when a capture begins.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming captured frames in loop order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex`
/// order within one `begin`/`end` cycle.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> DepthloopResult<()>;
    /// Push one frame in strictly increasing index order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DepthloopResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> DepthloopResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> DepthloopResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DepthloopResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> DepthloopResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Cloneable wrapper around an [`InMemorySink`].
///
/// The recorder takes ownership of its sink; a test hands over one clone and
/// inspects the captured frames through another.
#[derive(Clone, Debug, Default)]
pub struct SharedMemorySink {
    inner: Arc<Mutex<InMemorySink>>,
}

impl SharedMemorySink {
    /// Create an empty shared sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the wrapped sink.
    pub fn with<R>(&self, f: impl FnOnce(&InMemorySink) -> R) -> R {
        f(&self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl FrameSink for SharedMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> DepthloopResult<()> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DepthloopResult<()> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_frame(idx, frame)
    }

    fn end(&mut self) -> DepthloopResult<()> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .end()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/sink.rs"]
mod tests;
