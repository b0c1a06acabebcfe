use std::{
    ffi::OsString,
    io::{Read, Write},
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use anyhow::Context as _;

use crate::foundation::{
    core::FrameIndex,
    error::{CaptionError, CaptionResult},
};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    #[default]
    H264,
    H265,
}

impl Codec {
    pub fn ffmpeg_encoder(self) -> &'static str {
        match self {
            Self::H264 => "libx264",
            Self::H265 => "libx265",
        }
    }
}

impl std::fmt::Display for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::H264 => "h264",
            Self::H265 => "h265",
        })
    }
}

/// Settings for burning an overlay stream into an existing video.
#[derive(Clone, Debug)]
pub struct OverlayEncodeConfig {
    pub base_video: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub codec: Codec,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl OverlayEncodeConfig {
    pub fn validate(&self) -> CaptionResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CaptionError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(CaptionError::validation("encode fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(CaptionError::validation(
                "encode width/height must be even (required for yuv420p output)",
            ));
        }
        Ok(())
    }

    pub fn frame_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }

    /// Arguments after `ffmpeg`: base video as input 0, raw straight-alpha RGBA overlay frames on
    /// stdin as input 1, audio taken from the base video when it has any. The output stops at
    /// whichever of the base video and the overlay stream ends first, audio included.
    pub fn ffmpeg_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        let mut push = |s: &str| args.push(s.into());

        push(if self.overwrite { "-y" } else { "-n" });
        push("-loglevel");
        push("error");
        push("-i");
        args.push(self.base_video.clone().into_os_string());

        let size = format!("{}x{}", self.width, self.height);
        let fps = self.fps.to_string();
        args.extend(
            [
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "-s",
                size.as_str(),
                "-r",
                fps.as_str(),
                "-i",
                "pipe:0",
                "-filter_complex",
                "[0:v][1:v]overlay=0:0:shortest=1[v]",
                "-map",
                "[v]",
                "-map",
                "0:a?",
                "-c:v",
                self.codec.ffmpeg_encoder(),
                "-pix_fmt",
                "yuv420p",
                "-c:a",
                "aac",
                "-shortest",
                "-movflags",
                "+faststart",
            ]
            .map(OsString::from),
        );
        args.push(self.out_path.clone().into_os_string());
        args
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    tool_responds("ffmpeg")
}

pub(crate) fn tool_responds(bin: &str) -> bool {
    Command::new(bin)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> CaptionResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Streams caption overlay frames into a running `ffmpeg` that composites them over the base
/// video. Frames must arrive in strictly increasing order.
///
/// When the base video is shorter than the overlay stream, ffmpeg finishes the output and
/// closes its input early. Frames offered after that are dropped, and [`finish`](Self::finish)
/// reports how many actually reached ffmpeg.
pub struct FfmpegOverlayEncoder {
    cfg: OverlayEncodeConfig,
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    last_idx: Option<FrameIndex>,
    frames: u64,
    input_closed_at: Option<FrameIndex>,
}

impl FfmpegOverlayEncoder {
    pub fn new(cfg: OverlayEncodeConfig) -> CaptionResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(CaptionError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(CaptionError::render(
                "ffmpeg is required for encoding, but was not found on PATH",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .args(cfg.ffmpeg_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                CaptionError::render(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| CaptionError::render("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| CaptionError::render("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        tracing::debug!(
            out = %cfg.out_path.display(),
            codec = %cfg.codec,
            width = cfg.width,
            height = cfg.height,
            fps = cfg.fps,
            "ffmpeg started"
        );

        Ok(Self {
            cfg,
            child,
            stdin: Some(stdin),
            stderr_drain: Some(stderr_drain),
            last_idx: None,
            frames: 0,
            input_closed_at: None,
        })
    }

    pub fn encode_frame(&mut self, idx: FrameIndex, rgba: &[u8]) -> CaptionResult<()> {
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(CaptionError::render(format!(
                "encoder received out-of-order frame {} after {}",
                idx.0, last.0
            )));
        }
        if rgba.len() != self.cfg.frame_len() {
            return Err(CaptionError::validation(format!(
                "overlay frame is {} bytes, expected {} ({}x{} rgba)",
                rgba.len(),
                self.cfg.frame_len(),
                self.cfg.width,
                self.cfg.height
            )));
        }

        self.last_idx = Some(idx);
        if self.input_closed_at.is_some() {
            return Ok(());
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| CaptionError::render("ffmpeg encoder is already finalized"))?;
        match stdin.write_all(rgba) {
            Ok(()) => {
                self.frames += 1;
                Ok(())
            }
            // ffmpeg stopped reading; its exit status in `finish` says whether that was an error.
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                tracing::debug!(frame = idx.0, "ffmpeg closed the overlay stream");
                self.input_closed_at = Some(idx);
                drop(self.stdin.take());
                Ok(())
            }
            Err(e) => Err(CaptionError::render(format!(
                "failed to write frame to ffmpeg stdin: {e}"
            ))),
        }
    }

    /// Frames that reached ffmpeg so far.
    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    /// `false` once ffmpeg has stopped reading overlay frames.
    pub fn accepts_frames(&self) -> bool {
        self.input_closed_at.is_none()
    }

    /// Close the overlay stream and wait for ffmpeg. Returns the number of frames written.
    pub fn finish(mut self) -> CaptionResult<u64> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| CaptionError::render(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| CaptionError::render("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| CaptionError::render(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            return Err(CaptionError::render(format!(
                "ffmpeg exited with status {status}: {}",
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        if let Some(at) = self.input_closed_at {
            tracing::info!(
                frames = self.frames,
                dropped_from = at.0,
                "base video ended before the overlay; output truncated to the base video"
            );
        }
        Ok(self.frames)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
