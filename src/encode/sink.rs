use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{QuadwarpError, QuadwarpResult};
use crate::raster::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second (always the source rate).
    pub fps: Fps,
}

/// Sink contract for consuming output frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order, starting at
/// frame 0 and without gaps.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> QuadwarpResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> QuadwarpResult<()>;
    /// Called once after the last frame is pushed. Finalizes the output.
    fn end(&mut self) -> QuadwarpResult<()>;
    /// Release any held resources after a failure. Must be safe to call in any state.
    fn abort(&mut self) {}
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
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

    /// Whether `end` ran.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> QuadwarpResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> QuadwarpResult<()> {
        let expected = FrameIndex(self.frames.len() as u64);
        if idx != expected {
            return Err(QuadwarpError::write_failure(format!(
                "in-memory sink expected frame {}, got {}",
                expected.0, idx.0
            )));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> QuadwarpResult<()> {
        self.finished = true;
        Ok(())
    }
}
