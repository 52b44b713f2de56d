use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::assets::media::{VideoInfo, probe_video};
use crate::decode::source::FrameSource;
use crate::foundation::error::{QuadwarpError, QuadwarpResult};
use crate::raster::frame::FrameRGBA;

/// Source that decodes a video file frame by frame through a system `ffmpeg` child process.
///
/// Frames are streamed as raw RGBA8 over a pipe, so memory use stays at one frame regardless of
/// the video's length.
pub struct FfmpegSource {
    path: PathBuf,
    info: VideoInfo,
    frame_len: usize,

    child: Option<Child>,
    stdout: Option<BufReader<ChildStdout>>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl FfmpegSource {
    /// Probe `path` and start decoding it.
    #[tracing::instrument(level = "debug")]
    pub fn open(path: &Path) -> QuadwarpResult<Self> {
        let info = probe_video(path)?;
        Self::open_with_info(path, info)
    }

    /// Start decoding `path` with metadata already obtained from [`probe_video`].
    pub fn open_with_info(path: &Path, info: VideoInfo) -> QuadwarpResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args([
                "-map",
                "0:v:0",
                "-an",
                "-sn",
                "-dn",
                "-vsync",
                "passthrough",
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                QuadwarpError::unreadable_video(format!(
                    "failed to spawn ffmpeg for '{}' (is it installed and on PATH?): {e}",
                    path.display()
                ))
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (Some(stdout), Some(mut stderr)) = (stdout, stderr) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(QuadwarpError::unreadable_video(
                "failed to open ffmpeg stdio pipes (unexpected)",
            ));
        };
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        Ok(Self {
            path: path.to_path_buf(),
            frame_len: info.canvas().rgba8_len(),
            info,
            child: Some(child),
            stdout: Some(BufReader::new(stdout)),
            stderr_drain: Some(stderr_drain),
        })
    }

    fn finish(&mut self, kill: bool) -> QuadwarpResult<()> {
        drop(self.stdout.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        if kill {
            let _ = child.kill();
        }
        let status = child.wait().map_err(|e| {
            QuadwarpError::unreadable_video(format!("failed to wait for ffmpeg decoder: {e}"))
        })?;
        let stderr = match self.stderr_drain.take() {
            Some(handle) => handle.join().ok().and_then(|r| r.ok()).unwrap_or_default(),
            None => Vec::new(),
        };
        if !kill && !status.success() {
            return Err(QuadwarpError::unreadable_video(format!(
                "ffmpeg decode failed for '{}' ({status}): {}",
                self.path.display(),
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        Ok(())
    }
}

impl FrameSource for FfmpegSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> QuadwarpResult<Option<FrameRGBA>> {
        let Some(reader) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut buf = vec![0u8; self.frame_len];
        let filled = read_full(reader, &mut buf).map_err(|e| {
            QuadwarpError::unreadable_video(format!(
                "failed reading decoded frames from '{}': {e}",
                self.path.display()
            ))
        })?;

        if filled == 0 {
            self.finish(false)?;
            return Ok(None);
        }
        if filled < self.frame_len {
            let _ = self.finish(true);
            return Err(QuadwarpError::unreadable_video(format!(
                "truncated frame from '{}': got {filled} of {} bytes",
                self.path.display(),
                self.frame_len
            )));
        }
        FrameRGBA::from_raw(self.info.width, self.info.height, buf).map(Some)
    }

    fn close(&mut self) {
        if let Err(e) = self.finish(true) {
            tracing::warn!(error = %e, "failed to release ffmpeg decoder");
        }
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        self.close();
    }
}

/// Fill `buf` from `r`, stopping early only at end of stream. Returns the number of bytes read.
fn read_full(r: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
