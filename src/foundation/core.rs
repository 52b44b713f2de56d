use crate::foundation::error::{QuadwarpError, QuadwarpResult};

pub use kurbo::Point;

/// Slack applied before flooring a time-to-frame conversion so that values like `0.29 * 100`
/// (which lands at `28.999999999999996`) still resolve to the intended frame.
const FRAME_FLOOR_EPSILON: f64 = 1e-9;

/// Absolute 0-based frame index in source order.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> QuadwarpResult<Self> {
        if den == 0 {
            return Err(QuadwarpError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(QuadwarpError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Parse a rational rate as printed by `ffprobe` (`"30000/1001"`, `"25/1"`, or `"25"`).
    pub fn parse_ratio(s: &str) -> QuadwarpResult<Self> {
        let s = s.trim();
        let (num, den) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s, "1"),
        };
        let num = num
            .parse::<u32>()
            .map_err(|e| QuadwarpError::validation(format!("invalid fps numerator '{num}': {e}")))?;
        let den = den.parse::<u32>().map_err(|e| {
            QuadwarpError::validation(format!("invalid fps denominator '{den}': {e}"))
        })?;
        Self::new(num, den)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Convert seconds to a frame index using floor semantics.
    ///
    /// Negative and non-finite inputs clamp to frame 0.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        if !secs.is_finite() || secs <= 0.0 {
            return 0;
        }
        let frames = secs * f64::from(self.num) / f64::from(self.den);
        (frames + FRAME_FLOOR_EPSILON).floor().max(0.0) as u64
    }
}

impl std::fmt::Display for Fps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Number of pixels covered by the canvas.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        self.pixel_count() * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
