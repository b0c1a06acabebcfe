use crate::foundation::error::{CaptionError, CaptionResult};

/// A frame number on the render timeline.
///
/// Signed so that callers may evaluate frames before the first word (for example while probing
/// an animation curve); negative frames never match any caption window.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub i64);

impl FrameIndex {
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    pub fn offset(self, frames: i64) -> Self {
        Self(self.0.saturating_add(frames))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> CaptionResult<Self> {
        if start.0 > end.0 {
            return Err(CaptionError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// `[0, duration)`
    pub fn from_duration(duration_in_frames: u64) -> CaptionResult<Self> {
        let end = i64::try_from(duration_in_frames)
            .map_err(|_| CaptionError::validation("durationInFrames is too large"))?;
        Self::new(FrameIndex(0), FrameIndex(end))
    }

    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0).max(0) as u64
    }

    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }

    pub fn iter(self) -> impl Iterator<Item = FrameIndex> {
        (self.start.0..self.end.0).map(FrameIndex)
    }
}

/// Fixed integer frame rate governing a whole render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Fps(u32);

impl Fps {
    pub fn new(fps: u32) -> CaptionResult<Self> {
        if fps == 0 {
            return Err(CaptionError::validation("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Truncating conversion used for transcript timestamps; negative inputs map to frame 0.
    pub fn secs_to_frames_floor(self, secs: f64) -> i64 {
        (secs * f64::from(self.0)).floor().max(0.0) as i64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn validate(self) -> CaptionResult<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(CaptionError::validation("canvas width/height must be > 0"));
        }
        Ok(self)
    }
}

/// Straight (non-premultiplied) RGBA8 color, serialized as `#rrggbb` or `#rrggbbaa`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn from_hex(s: &str) -> CaptionResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| CaptionError::validation(format!("color '{s}' must start with '#'")))?;
        if !hex.is_ascii() {
            return Err(CaptionError::validation(format!("color '{s}' is not hex")));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| CaptionError::validation(format!("color '{s}' is not hex")))
        };
        match hex.len() {
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => Err(CaptionError::validation(format!(
                "color '{s}' must be #rrggbb or #rrggbbaa"
            ))),
        }
    }

    /// `#rrggbb`, alpha is dropped.
    pub fn to_hex_rgb(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl From<Rgba8> for String {
    fn from(c: Rgba8) -> Self {
        if c.a == 255 {
            c.to_hex_rgb()
        } else {
            format!("{}{:02x}", c.to_hex_rgb(), c.a)
        }
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = CaptionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
