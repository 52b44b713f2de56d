use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{QuadwarpError, QuadwarpResult};
use crate::raster::frame::FrameRGBA;
use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// libx264 constant rate factor (0 is lossless).
    pub crf: u8,
    /// libx264 preset name.
    pub preset: String,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            crf: 18,
            preset: "medium".to_string(),
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGBA frames to its stdin.
///
/// Output is H.264 in an MP4 container at the configured rational frame rate. Even-sized frames
/// use `yuv420p`; odd sizes use `yuv444p`, which has no chroma subsampling.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }

    fn build_command(&self, cfg: &SinkConfig) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);

        let pix_fmt = if cfg.width.is_multiple_of(2) && cfg.height.is_multiple_of(2) {
            "yuv420p"
        } else {
            "yuv444p"
        };
        // Repeated runs over the same input must produce identical files.
        cmd.args([
            "-an",
            "-c:v",
            "libx264",
            "-preset",
            &self.opts.preset,
            "-crf",
            &self.opts.crf.to_string(),
            "-pix_fmt",
            pix_fmt,
            "-fflags",
            "+bitexact",
            "-flags:v",
            "+bitexact",
            "-map_metadata",
            "-1",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&self.opts.out_path);
        cmd
    }

    fn reap(&mut self) -> QuadwarpResult<(std::process::ExitStatus, Vec<u8>)> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| QuadwarpError::write_failure("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            QuadwarpError::write_failure(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| QuadwarpError::write_failure("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| {
                    QuadwarpError::write_failure(format!("ffmpeg stderr read failed: {e}"))
                })?,
            None => Vec::new(),
        };
        Ok((status, stderr_bytes))
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> QuadwarpResult<()> {
        if self.child.is_some() {
            return Err(QuadwarpError::write_failure("ffmpeg sink already started"));
        }
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(QuadwarpError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(QuadwarpError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(QuadwarpError::write_failure(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(QuadwarpError::write_failure(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut child = self.build_command(&cfg).spawn().map_err(|e| {
            QuadwarpError::write_failure(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child.stdin.take();
        let stderr = child.stderr.take();
        let (Some(stdin), Some(mut stderr)) = (stdin, stderr) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(QuadwarpError::write_failure(
                "failed to open ffmpeg stdio pipes (unexpected)",
            ));
        };
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            fps = %cfg.fps,
            "ffmpeg encoder started"
        );
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> QuadwarpResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| QuadwarpError::write_failure("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(QuadwarpError::write_failure(
                "ffmpeg sink received out-of-order frame index",
            ));
        }

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(QuadwarpError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != frame.canvas().rgba8_len() {
            return Err(QuadwarpError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(QuadwarpError::write_failure("ffmpeg sink is already finalized"));
        };
        stdin.write_all(&frame.data).map_err(|e| {
            QuadwarpError::write_failure(format!(
                "failed to write frame {} to ffmpeg stdin: {e}",
                idx.0
            ))
        })?;
        self.last_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> QuadwarpResult<()> {
        let (status, stderr_bytes) = self.reap()?;
        self.cfg = None;
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(QuadwarpError::write_failure(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn abort(&mut self) {
        if self.child.is_none() {
            return;
        }
        // Closing stdin lets ffmpeg finalize whatever it already received.
        match self.reap() {
            Ok((status, _)) => {
                tracing::debug!(%status, "ffmpeg encoder released after failure");
            }
            Err(e) => tracing::warn!(error = %e, "failed to release ffmpeg encoder"),
        }
        self.cfg = None;
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        self.abort();
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate; rational rates pass through
    // as `num/den`.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> QuadwarpResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))
            .map_err(|e| QuadwarpError::write_failure(format!("{e:#}")))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_on_path("ffmpeg")
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    tool_on_path("ffprobe")
}

fn tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
