use crate::assets::overlay::OverlayImage;
use crate::composite::composite_frame;
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{QuadwarpError, QuadwarpResult};
use crate::geometry::homography::{QuadGeometry, solve_quad};
use crate::pipeline::job::Region;
use crate::raster::frame::FrameRGBA;
use crate::raster::mask::{Mask, build_mask};
use crate::raster::resample::resize_overlay;
use crate::raster::warp::warp_perspective;

/// Everything the per-frame compositor needs, computed once before streaming.
///
/// The plan is read-only after [`OverlayPlan::prepare`] and is shared by reference across worker
/// threads.
#[derive(Clone, Debug)]
pub struct OverlayPlan {
    /// Solved quad geometry.
    pub geometry: QuadGeometry,
    /// Overlay projected into frame space, premultiplied.
    pub warped: FrameRGBA,
    /// Replacement mask.
    pub mask: Mask,
    /// First frame that receives the overlay.
    pub start_frame: FrameIndex,
}

impl OverlayPlan {
    /// Solve, resample, warp and rasterize the mask for `region` on a `canvas`-sized video.
    #[tracing::instrument(level = "debug", skip(overlay))]
    pub fn prepare(
        overlay: &OverlayImage,
        region: &Region,
        canvas: Canvas,
        fps: Fps,
    ) -> QuadwarpResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(QuadwarpError::unreadable_video("video has zero-sized frames"));
        }

        let geometry = solve_quad(&region.quad)?;
        let resized = resize_overlay(overlay, geometry.width, geometry.height)?;
        let warped = warp_perspective(&resized, &geometry.homography, canvas)?;
        let mask = build_mask(&region.quad, canvas);
        let start_frame = FrameIndex(fps.secs_to_frames_floor(region.start_time_sec));

        tracing::debug!(
            start_frame = start_frame.0,
            mask_pixels = mask.count_on(),
            "overlay plan ready"
        );
        Ok(Self {
            geometry,
            warped,
            mask,
            start_frame,
        })
    }

    /// Frame dimensions the plan was built for.
    pub fn canvas(&self) -> Canvas {
        self.warped.canvas()
    }

    /// Composite frame `idx`.
    pub fn composite(&self, frame: FrameRGBA, idx: FrameIndex) -> QuadwarpResult<FrameRGBA> {
        composite_frame(frame, idx, self.start_frame, &self.warped, &self.mask)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/plan.rs"]
mod tests;
