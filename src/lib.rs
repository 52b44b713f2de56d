//! `quadwarp` replaces a quadrilateral region of every video frame, from a given timestamp on,
//! with a perspective-warped still image.
//!
//! The pipeline solves a rectangle-to-quad homography once, resamples and warps the overlay into
//! frame space, rasterizes the quad into a mask, and then streams frames from a [`FrameSource`]
//! through the compositor into a [`FrameSink`]. Frames before the start frame pass through
//! unchanged; output frame count, rate and size always match the source.
//!
//! Video decode and encode go through the system `ffmpeg`/`ffprobe` binaries. In-memory sources
//! and sinks are available for embedding and tests.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Overlay image loading and video probing.
pub mod assets;
/// Per-pixel compositing of the warped overlay onto a frame.
pub mod composite;
/// Frame sources.
pub mod decode;
/// Frame sinks.
pub mod encode;
/// Quadrilaterals and the projective transform.
pub mod geometry;
/// Job model and streaming driver.
pub mod pipeline;
/// Frame rasters, resampling, warping and masking.
pub mod raster;

mod foundation;

pub use assets::media::{VideoInfo, parse_probe_json, probe_video};
pub use assets::overlay::{OverlayImage, decode_overlay, load_overlay};
pub use composite::{PremulRgba8, composite_frame, over};
pub use decode::ffmpeg::FfmpegSource;
pub use decode::source::{FrameSource, InMemorySource};
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path, is_ffprobe_on_path};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Canvas, Fps, FrameIndex, Point};
pub use foundation::error::{QuadwarpError, QuadwarpResult};
pub use geometry::homography::{Homography, QuadGeometry, solve_quad};
pub use geometry::quad::Quad;
pub use pipeline::driver::{
    PipelineOpts, PipelineState, ReplaceReport, RunStats, preview_frame, preview_from_source,
    replace_region, run_pipeline, stream_frames,
};
pub use pipeline::job::{Region, RegionEntry, ReplaceJob};
pub use pipeline::plan::OverlayPlan;
pub use raster::frame::FrameRGBA;
pub use raster::mask::{MASK_ON, Mask, build_mask};
pub use raster::resample::resize_overlay;
pub use raster::warp::warp_perspective;
