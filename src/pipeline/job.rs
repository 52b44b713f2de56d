use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{QuadwarpError, QuadwarpResult};
use crate::geometry::quad::Quad;

/// One destination region: where the overlay goes and from when.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegionEntry {
    /// Presentation time, in seconds, from which the overlay is shown.
    pub time_sec: f64,
    /// Quad corners as `[x, y]`, in order top-left, top-right, bottom-right, bottom-left.
    pub points: Vec<[f64; 2]>,
}

impl RegionEntry {
    /// Validate and convert into a [`Region`].
    pub fn to_region(&self) -> QuadwarpResult<Region> {
        if !self.time_sec.is_finite() || self.time_sec < 0.0 {
            return Err(QuadwarpError::validation(format!(
                "region time_sec must be finite and >= 0, got {}",
                self.time_sec
            )));
        }
        Ok(Region {
            quad: Quad::from_xy(&self.points)?,
            start_time_sec: self.time_sec,
        })
    }
}

/// Validated region: destination quad plus start time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    /// Destination quadrilateral in frame pixel coordinates.
    pub quad: Quad,
    /// Start time in seconds.
    pub start_time_sec: f64,
}

/// A complete replacement job.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReplaceJob {
    /// Source video.
    pub video: PathBuf,
    /// Overlay image.
    pub image: PathBuf,
    /// Output video.
    pub output: PathBuf,
    /// Region entries. Only the first is used.
    pub regions: Vec<RegionEntry>,
}

impl ReplaceJob {
    /// Load a job from a JSON file.
    pub fn from_path(path: &Path) -> QuadwarpResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read job file '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse a job from JSON text.
    pub fn from_json_str(text: &str) -> QuadwarpResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| QuadwarpError::validation(format!("invalid job json: {e}")))
    }

    /// The region this job applies.
    ///
    /// Entries after the first are ignored with a warning.
    pub fn first_region(&self) -> QuadwarpResult<Region> {
        let first = self
            .regions
            .first()
            .ok_or_else(|| QuadwarpError::validation("job has no region entries"))?;
        if self.regions.len() > 1 {
            tracing::warn!(
                ignored = self.regions.len() - 1,
                "only the first region entry is applied; ignoring the rest"
            );
        }
        first.to_region()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/job.rs"]
mod tests;
