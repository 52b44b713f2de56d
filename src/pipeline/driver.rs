use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::assets::media::probe_video;
use crate::assets::overlay::{OverlayImage, load_overlay};
use crate::decode::ffmpeg::FfmpegSource;
use crate::decode::source::FrameSource;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{QuadwarpError, QuadwarpResult};
use crate::pipeline::job::{Region, ReplaceJob};
use crate::pipeline::plan::OverlayPlan;
use crate::raster::frame::FrameRGBA;

/// Execution options for the streaming stage.
#[derive(Clone, Debug)]
pub struct PipelineOpts {
    /// Composite frames on a rayon pool, a chunk at a time.
    pub parallel: bool,
    /// Frames per parallel chunk. `0` is treated as `1`.
    pub chunk_size: usize,
    /// Worker count for the pool. `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Emit a progress event every this many frames. `0` disables progress events.
    pub progress_every: u64,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            progress_every: 50,
        }
    }
}

/// Driver lifecycle, logged on every transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// Inputs accepted, nothing opened yet.
    Init,
    /// Metadata read; overlay plan being prepared.
    Configuring,
    /// Frames flowing from source to sink.
    Streaming,
    /// Output finalized.
    Completed,
    /// A step failed; handles released.
    Failed,
}

fn enter(state: PipelineState) {
    tracing::info!(?state, "pipeline state");
}

/// Counters from one streaming run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Frames pushed to the sink.
    pub frames_written: u64,
    /// Frames that received the overlay.
    pub frames_replaced: u64,
    /// First frame that received the overlay.
    pub start_frame: FrameIndex,
}

/// Result of [`replace_region`].
#[derive(Clone, Debug, PartialEq)]
pub struct ReplaceReport {
    /// Path of the written video.
    pub output_path: PathBuf,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frame rate (equal to the source's).
    pub fps: Fps,
    /// Output duration in seconds, from the frame count and rate.
    pub duration_secs: f64,
    /// Streaming counters.
    pub stats: RunStats,
}

/// Run the full pipeline over an already-open source and sink.
///
/// Prepares the overlay plan from the source's metadata, then streams every frame through the
/// compositor into `sink`. On failure the sink is aborted and the source closed before the error
/// is returned; the sink is never begun if preparation fails.
#[tracing::instrument(level = "info", skip_all)]
pub fn run_pipeline(
    source: &mut dyn FrameSource,
    overlay: &OverlayImage,
    region: &Region,
    sink: &mut dyn FrameSink,
    opts: &PipelineOpts,
) -> QuadwarpResult<RunStats> {
    enter(PipelineState::Init);
    enter(PipelineState::Configuring);
    let info = source.info().clone();
    let plan = match OverlayPlan::prepare(overlay, region, info.canvas(), info.fps) {
        Ok(plan) => plan,
        Err(e) => {
            source.close();
            enter(PipelineState::Failed);
            return Err(e);
        }
    };
    stream_frames(source, &plan, sink, opts)
}

/// Stream every frame of `source` through `plan` into `sink`.
///
/// Frames reach the sink in source order, numbered from 0, whether or not compositing runs in
/// parallel.
#[tracing::instrument(level = "info", skip_all, fields(start_frame = plan.start_frame.0))]
pub fn stream_frames(
    source: &mut dyn FrameSource,
    plan: &OverlayPlan,
    sink: &mut dyn FrameSink,
    opts: &PipelineOpts,
) -> QuadwarpResult<RunStats> {
    enter(PipelineState::Streaming);
    let result = stream_inner(source, plan, sink, opts);
    source.close();
    match result {
        Ok(stats) => {
            enter(PipelineState::Completed);
            Ok(stats)
        }
        Err(e) => {
            sink.abort();
            enter(PipelineState::Failed);
            Err(e)
        }
    }
}

fn stream_inner(
    source: &mut dyn FrameSource,
    plan: &OverlayPlan,
    sink: &mut dyn FrameSink,
    opts: &PipelineOpts,
) -> QuadwarpResult<RunStats> {
    let info = source.info().clone();
    let Some(first) = source.next_frame()? else {
        return Err(QuadwarpError::unreadable_video("video yielded no frames"));
    };

    sink.begin(SinkConfig {
        width: info.width,
        height: info.height,
        fps: info.fps,
    })?;

    let mut progress = Progress {
        every: opts.progress_every,
        total: info.frame_count,
        done: 0,
    };

    if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        let chunk_size = normalized_chunk_size(opts.chunk_size);
        let mut pending = Some(first);
        loop {
            let base = progress.done;
            let mut chunk = Vec::with_capacity(chunk_size);
            chunk.extend(pending.take());
            while chunk.len() < chunk_size {
                match source.next_frame()? {
                    Some(f) => chunk.push(f),
                    None => break,
                }
            }
            if chunk.is_empty() {
                break;
            }
            for (i, f) in chunk.iter().enumerate() {
                check_frame_dims(plan, f, base + i as u64)?;
            }

            let composited = pool.install(|| {
                chunk
                    .into_par_iter()
                    .enumerate()
                    .map(|(i, f)| plan.composite(f, FrameIndex(base + i as u64)))
                    .collect::<Vec<_>>()
            });
            for frame in composited {
                let idx = FrameIndex(progress.done);
                sink.push_frame(idx, &frame?)?;
                progress.advance();
            }
        }
    } else {
        let mut pending = Some(first);
        loop {
            let frame = match pending.take() {
                Some(f) => f,
                None => match source.next_frame()? {
                    Some(f) => f,
                    None => break,
                },
            };
            let idx = FrameIndex(progress.done);
            check_frame_dims(plan, &frame, idx.0)?;
            let out = plan.composite(frame, idx)?;
            sink.push_frame(idx, &out)?;
            progress.advance();
        }
    }

    sink.end()?;

    let written = progress.done;
    if let Some(expected) = info.frame_count
        && expected != written
    {
        tracing::warn!(
            expected,
            written,
            "decoded frame count differs from the probed count"
        );
    }
    let stats = RunStats {
        frames_written: written,
        frames_replaced: written.saturating_sub(plan.start_frame.0),
        start_frame: plan.start_frame,
    };
    tracing::info!(
        frames_written = stats.frames_written,
        frames_replaced = stats.frames_replaced,
        duration_secs = info.fps.frames_to_secs(written),
        "stream finished"
    );
    Ok(stats)
}

struct Progress {
    every: u64,
    total: Option<u64>,
    done: u64,
}

impl Progress {
    fn advance(&mut self) {
        self.done += 1;
        if self.every > 0 && self.done % self.every == 0 {
            match self.total {
                Some(total) => tracing::info!("processed {}/{} frames", self.done, total),
                None => tracing::info!("processed {} frames", self.done),
            }
        }
    }
}

fn check_frame_dims(plan: &OverlayPlan, frame: &FrameRGBA, idx: u64) -> QuadwarpResult<()> {
    let canvas = plan.canvas();
    if frame.canvas() != canvas || frame.data.len() != canvas.rgba8_len() {
        return Err(QuadwarpError::unreadable_video(format!(
            "decoded frame {idx} is {}x{}, expected {}x{}",
            frame.width, frame.height, canvas.width, canvas.height
        )));
    }
    Ok(())
}

/// Replace the job's region in its video and write the result to `job.output`.
///
/// Inputs are validated, probed and decoded, and the overlay plan is prepared before the output
/// file is opened, so bad inputs and degenerate quads never leave an output behind.
#[tracing::instrument(level = "info", skip_all, fields(video = %job.video.display(), output = %job.output.display()))]
pub fn replace_region(job: &ReplaceJob, opts: &PipelineOpts) -> QuadwarpResult<ReplaceReport> {
    enter(PipelineState::Init);
    let region = job.first_region()?;
    let info = probe_video(&job.video)?;

    enter(PipelineState::Configuring);
    let overlay = load_overlay(&job.image)?;
    let plan = OverlayPlan::prepare(&overlay, &region, info.canvas(), info.fps)?;
    tracing::info!(
        width = info.width,
        height = info.height,
        fps = %info.fps,
        frames = ?info.frame_count,
        start_frame = plan.start_frame.0,
        "configured"
    );

    let mut source = FfmpegSource::open_with_info(&job.video, info.clone())?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(job.output.clone()));
    let stats = stream_frames(&mut source, &plan, &mut sink, opts)?;

    Ok(ReplaceReport {
        output_path: job.output.clone(),
        width: info.width,
        height: info.height,
        fps: info.fps,
        duration_secs: info.fps.frames_to_secs(stats.frames_written),
        stats,
    })
}

/// Composite a single frame of `video` for checking overlay placement.
///
/// Frames are decoded up to `frame`; the start time in `region` applies as usual, so a frame
/// before the start comes back unchanged.
#[tracing::instrument(level = "info", skip(region))]
pub fn preview_frame(
    video: &Path,
    image: &Path,
    region: &Region,
    frame: FrameIndex,
) -> QuadwarpResult<FrameRGBA> {
    let info = probe_video(video)?;
    let overlay = load_overlay(image)?;
    let plan = OverlayPlan::prepare(&overlay, region, info.canvas(), info.fps)?;
    let mut source = FfmpegSource::open_with_info(video, info)?;
    let result = preview_from_source(&mut source, &plan, frame);
    source.close();
    result
}

/// Composite frame `frame` of `source` through `plan`, discarding the frames before it.
pub fn preview_from_source(
    source: &mut dyn FrameSource,
    plan: &OverlayPlan,
    frame: FrameIndex,
) -> QuadwarpResult<FrameRGBA> {
    let mut idx = 0u64;
    while let Some(decoded) = source.next_frame()? {
        if idx == frame.0 {
            check_frame_dims(plan, &decoded, idx)?;
            return plan.composite(decoded, frame);
        }
        idx += 1;
    }
    Err(QuadwarpError::validation(format!(
        "frame {} is past the end of the video ({idx} frames)",
        frame.0
    )))
}

fn build_thread_pool(threads: Option<usize>) -> QuadwarpResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(QuadwarpError::validation(
            "pipeline 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| QuadwarpError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> usize {
    chunk_size.max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/driver.rs"]
mod tests;
