//! Center-cropping background footage to the 9:16 portrait frame captions are laid out for.

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{
    encode::{
        ffmpeg::{Codec, ensure_parent_dir, is_ffmpeg_on_path},
        probe::probe_video_size,
    },
    foundation::{
        core::Canvas,
        error::{CaptionError, CaptionResult},
    },
};

/// Footage within this distance of 9:16 is used as is.
pub const PORTRAIT_TOLERANCE: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl CropRect {
    pub fn ffmpeg_filter(&self) -> String {
        format!("crop={}:{}:{}:{}", self.width, self.height, self.x, self.y)
    }
}

/// Largest centered 9:16 window inside `size`, or `None` when `size` is already portrait.
/// Sides are rounded down to even numbers for yuv420p output.
pub fn vertical_crop(size: Canvas) -> Option<CropRect> {
    let (w, h) = (u64::from(size.width), u64::from(size.height));
    if (w as f64 / h as f64 - 9.0 / 16.0).abs() < PORTRAIT_TOLERANCE {
        return None;
    }

    let width = (w.min(h * 9 / 16) & !1) as u32;
    let height = (h.min(w * 16 / 9) & !1) as u32;
    Some(CropRect {
        width,
        height,
        x: (size.width - width) / 2,
        y: (size.height - height) / 2,
    })
}

/// Crop `input` to portrait into `output`. Returns the path to use as the base video:
/// `input` itself when no crop is needed.
#[tracing::instrument(skip_all, fields(input = %input.display()))]
pub fn crop_vertical(input: &Path, output: &Path, codec: Codec) -> CaptionResult<PathBuf> {
    let size = probe_video_size(input)?;
    let Some(rect) = vertical_crop(size) else {
        tracing::info!("already portrait; no crop needed");
        return Ok(input.to_path_buf());
    };

    if !is_ffmpeg_on_path() {
        return Err(CaptionError::render(
            "ffmpeg is required for cropping, but was not found on PATH",
        ));
    }
    ensure_parent_dir(output)?;

    let out = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-i"])
        .arg(input)
        .args(["-vf", rect.ffmpeg_filter().as_str()])
        .args(["-c:v", codec.ffmpeg_encoder(), "-pix_fmt", "yuv420p", "-c:a", "aac"])
        .arg(output)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            CaptionError::render(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
    if !out.status.success() {
        return Err(CaptionError::render(format!(
            "ffmpeg crop failed: {}",
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    tracing::info!(
        from = %format!("{}x{}", size.width, size.height),
        to = %format!("{}x{}", rect.width, rect.height),
        out = %output.display(),
        "cropped to portrait"
    );
    Ok(output.to_path_buf())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/crop.rs"]
mod tests;
