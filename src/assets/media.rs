use std::path::Path;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{QuadwarpError, QuadwarpResult};

/// Stream metadata read once from the source video.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoInfo {
    /// Decoded (display-oriented) width in pixels.
    pub width: u32,
    /// Decoded (display-oriented) height in pixels.
    pub height: u32,
    /// Frame rate.
    pub fps: Fps,
    /// Frame count reported by the container (or estimated from duration when absent).
    pub frame_count: Option<u64>,
    /// Source pixel format as named by ffmpeg (`yuv420p`, ...).
    pub pix_fmt: Option<String>,
}

impl VideoInfo {
    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    pix_fmt: Option<String>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
    tags: Option<ProbeTags>,
}

#[derive(serde::Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

#[derive(serde::Deserialize)]
struct ProbeTags {
    rotate: Option<String>,
}

impl ProbeStream {
    /// Display rotation in degrees, from the display matrix side data or the legacy `rotate` tag.
    fn rotation(&self) -> f64 {
        self.side_data_list
            .iter()
            .find_map(|sd| sd.rotation)
            .or_else(|| {
                self.tags
                    .as_ref()
                    .and_then(|t| t.rotate.as_deref())
                    .and_then(|r| r.trim().parse::<f64>().ok())
            })
            .unwrap_or(0.0)
    }
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Probe the first video stream of `source_path` through `ffprobe`.
#[tracing::instrument(level = "debug")]
pub fn probe_video(source_path: &Path) -> QuadwarpResult<VideoInfo> {
    if !source_path.is_file() {
        return Err(QuadwarpError::unreadable_video(format!(
            "'{}' does not exist or is not a file",
            source_path.display()
        )));
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| QuadwarpError::unreadable_video(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(QuadwarpError::unreadable_video(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    parse_probe_json(&out.stdout).map_err(|e| match e {
        QuadwarpError::UnreadableVideo(msg) => {
            QuadwarpError::unreadable_video(format!("'{}': {msg}", source_path.display()))
        }
        other => other,
    })
}

/// Parse `ffprobe -print_format json` output into [`VideoInfo`].
pub fn parse_probe_json(json: &[u8]) -> QuadwarpResult<VideoInfo> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| QuadwarpError::unreadable_video(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| QuadwarpError::unreadable_video("no video stream found"))?;

    let coded_width = stream
        .width
        .filter(|w| *w > 0)
        .ok_or_else(|| QuadwarpError::unreadable_video("missing video width from ffprobe"))?;
    let coded_height = stream
        .height
        .filter(|h| *h > 0)
        .ok_or_else(|| QuadwarpError::unreadable_video("missing video height from ffprobe"))?;

    // ffmpeg autorotates on decode, so quarter-turn streams come out transposed.
    let rotation = stream.rotation();
    let quarter_turn = (rotation / 90.0).round().rem_euclid(2.0) == 1.0;
    let (width, height) = if quarter_turn {
        tracing::debug!(rotation, "stream is rotated a quarter turn; swapping dimensions");
        (coded_height, coded_width)
    } else {
        (coded_width, coded_height)
    };

    let fps = [&stream.avg_frame_rate, &stream.r_frame_rate]
        .into_iter()
        .flatten()
        .find_map(|s| Fps::parse_ratio(s).ok())
        .ok_or_else(|| QuadwarpError::unreadable_video("missing or zero frame rate"))?;

    let duration = stream
        .duration
        .as_deref()
        .or_else(|| parsed.format.as_ref().and_then(|f| f.duration.as_deref()))
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0);
    let frame_count = stream
        .nb_frames
        .as_deref()
        .and_then(|n| n.parse::<u64>().ok())
        .or_else(|| duration.map(|d| (d * fps.as_f64()).round() as u64));
    if frame_count == Some(0) {
        return Err(QuadwarpError::unreadable_video("video stream has zero frames"));
    }

    Ok(VideoInfo {
        width,
        height,
        fps,
        frame_count,
        pix_fmt: stream.pix_fmt.clone(),
    })
}
