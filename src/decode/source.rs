use std::collections::VecDeque;

use crate::assets::media::VideoInfo;
use crate::foundation::error::{QuadwarpError, QuadwarpResult};
use crate::raster::frame::FrameRGBA;

/// Sequential frame producer.
///
/// Frames come out in decode order; `next_frame` returns `Ok(None)` once the stream is exhausted.
pub trait FrameSource: Send {
    /// Stream metadata, fixed for the lifetime of the source.
    fn info(&self) -> &VideoInfo;
    /// Decode the next frame.
    fn next_frame(&mut self) -> QuadwarpResult<Option<FrameRGBA>>;
    /// Release the underlying decoder. Must be safe to call more than once.
    fn close(&mut self) {}
}

/// Source over pre-decoded frames, for tests and embedding.
#[derive(Debug)]
pub struct InMemorySource {
    info: VideoInfo,
    frames: VecDeque<FrameRGBA>,
}

impl InMemorySource {
    /// Wrap `frames`, checking each matches the declared dimensions.
    ///
    /// `info.frame_count` is overwritten with the number of frames supplied.
    pub fn new(mut info: VideoInfo, frames: Vec<FrameRGBA>) -> QuadwarpResult<Self> {
        if let Some((i, f)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.width != info.width || f.height != info.height)
        {
            return Err(QuadwarpError::validation(format!(
                "frame {i} is {}x{}, source declares {}x{}",
                f.width, f.height, info.width, info.height
            )));
        }
        info.frame_count = Some(frames.len() as u64);
        Ok(Self {
            info,
            frames: frames.into(),
        })
    }

    /// Frames not yet consumed.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for InMemorySource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> QuadwarpResult<Option<FrameRGBA>> {
        Ok(self.frames.pop_front())
    }

    fn close(&mut self) {
        self.frames.clear();
    }
}
