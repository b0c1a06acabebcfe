//! `ffprobe` queries for the base video: pixel size, frame rate and length.

use std::{
    collections::HashMap,
    path::Path,
    process::{Command, Stdio},
};

use crate::{
    encode::ffmpeg::tool_responds,
    foundation::{
        core::{Canvas, Fps},
        error::{CaptionError, CaptionResult},
    },
};

pub fn is_ffprobe_on_path() -> bool {
    tool_responds("ffprobe")
}

fn run_ffprobe(path: &Path, entries: &str, format: &str) -> CaptionResult<String> {
    let out = Command::new("ffprobe")
        .args(["-v", "error", "-select_streams", "v:0", "-show_entries", entries])
        .args(["-of", format])
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            CaptionError::render(format!(
                "failed to spawn ffprobe (is it installed and on PATH?): {e}"
            ))
        })?;

    if !out.status.success() {
        return Err(CaptionError::render(format!(
            "ffprobe failed on '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}

/// Pixel size of the first video stream of `path`.
pub fn probe_video_size(path: &Path) -> CaptionResult<Canvas> {
    parse_probe_size(&run_ffprobe(path, "stream=width,height", "csv=p=0")?)
}

pub(crate) fn parse_probe_size(stdout: &str) -> CaptionResult<Canvas> {
    let line = stdout.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    let mut parts = line.split(',').map(|p| p.trim().parse::<u32>());
    match (parts.next(), parts.next()) {
        (Some(Ok(width)), Some(Ok(height))) => Canvas { width, height }.validate(),
        _ => Err(CaptionError::render(format!(
            "unexpected ffprobe output: '{line}'"
        ))),
    }
}

/// Frame rate and length of a video's first stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoTiming {
    /// Nominal rate, possibly fractional (`30000/1001`).
    pub frame_rate: f64,
    /// Frame count from the container, when it records one.
    pub frame_count: Option<u64>,
    /// Container duration in seconds.
    pub duration_secs: Option<f64>,
}

impl VideoTiming {
    /// Integer render rate: the nominal rate truncated.
    pub fn fps(&self) -> CaptionResult<Fps> {
        Fps::new(self.frame_rate.floor() as u32)
    }

    /// Length in seconds, preferring `frame_count / frame_rate` over the container duration.
    pub fn length_secs(&self) -> CaptionResult<f64> {
        match (self.frame_count, self.duration_secs) {
            (Some(n), _) if n > 0 => Ok(n as f64 / self.frame_rate),
            (_, Some(d)) if d.is_finite() && d > 0.0 => Ok(d),
            _ => Err(CaptionError::render("video has no usable length")),
        }
    }

    /// Length expressed at the truncated integer rate, truncated to whole frames.
    pub fn duration_in_frames(&self) -> CaptionResult<u64> {
        let fps = self.fps()?;
        let frames = (self.length_secs()? * f64::from(fps.get())).floor() as u64;
        if frames == 0 {
            return Err(CaptionError::render("video is shorter than one frame"));
        }
        Ok(frames)
    }
}

pub fn probe_video_timing(path: &Path) -> CaptionResult<VideoTiming> {
    parse_probe_timing(&run_ffprobe(
        path,
        "stream=r_frame_rate,nb_frames:format=duration",
        "default=noprint_wrappers=1",
    )?)
}

fn parse_rate(s: &str) -> Option<f64> {
    let rate = match s.split_once('/') {
        Some((num, den)) => {
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num.trim().parse::<f64>().ok()? / den
        }
        None => s.trim().parse::<f64>().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

pub(crate) fn parse_probe_timing(stdout: &str) -> CaptionResult<VideoTiming> {
    let fields: HashMap<&str, &str> = stdout
        .lines()
        .filter_map(|l| l.trim().split_once('='))
        .collect();

    let frame_rate = fields
        .get("r_frame_rate")
        .and_then(|r| parse_rate(r))
        .ok_or_else(|| {
            CaptionError::render(format!(
                "ffprobe reported no usable frame rate: '{}'",
                stdout.trim()
            ))
        })?;
    if frame_rate < 1.0 {
        return Err(CaptionError::render(format!(
            "video frame rate {frame_rate} is below one frame per second"
        )));
    }

    Ok(VideoTiming {
        frame_rate,
        frame_count: fields.get("nb_frames").and_then(|n| n.trim().parse().ok()),
        duration_secs: fields.get("duration").and_then(|d| d.trim().parse().ok()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/probe.rs"]
mod tests;
