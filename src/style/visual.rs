use crate::{
    foundation::core::{FrameIndex, Rgba8},
    style::CaptionStyle,
};

/// Font and placement shared by every word of a caption line.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Typography {
    pub font_family: String,
    pub font_size_px: f64,
    pub font_weight: u16,
    pub italic: bool,
    /// Distance from the bottom edge of the frame to the bottom of the caption block.
    pub bottom_px: f64,
    /// Horizontal space inserted before each word.
    pub word_gap_px: f64,
}

/// CSS-like text shadow: offset, blur radius, color.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextShadow {
    pub dx: f64,
    pub dy: f64,
    pub blur_px: f64,
    pub color: Rgba8,
}

impl TextShadow {
    /// Hard black drop shadow used by most styles.
    pub const fn drop() -> Self {
        Self {
            dx: 4.0,
            dy: 4.0,
            blur_px: 4.0,
            color: Rgba8::BLACK,
        }
    }

    pub const fn glow(blur_px: f64, color: Rgba8) -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            blur_px,
            color,
        }
    }
}

/// Solid rounded box drawn behind text.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Highlight {
    pub color: Rgba8,
    pub corner_radius_px: f64,
    /// Extra space around the text box, horizontal then vertical.
    pub pad_x_px: f64,
    pub pad_y_px: f64,
    /// Scale of the box alone around its center; the text it sits behind is not scaled.
    #[serde(default = "unit_scale")]
    pub scale: f64,
}

fn unit_scale() -> f64 {
    1.0
}

/// Render-ready description of one word on one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WordVisual {
    pub text: String,
    pub active: bool,
    pub color: Rgba8,
    pub scale: f64,
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Highlight>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shadows: Vec<TextShadow>,
}

impl WordVisual {
    /// Plain word: scale 1, fully opaque, no box and no shadow.
    pub fn plain(text: String, active: bool, color: Rgba8) -> Self {
        Self {
            text,
            active,
            color,
            scale: 1.0,
            opacity: 1.0,
            highlight: None,
            shadows: Vec::new(),
        }
    }
}

/// The caption layer for one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionOverlay {
    pub style: CaptionStyle,
    /// Position of the active group in the composition's group list.
    pub group: usize,
    pub typography: Typography,
    /// Box behind the whole line (typing style).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel: Option<Highlight>,
    pub words: Vec<WordVisual>,
}

/// Everything drawn on top of the base video for a frame. `overlay == None` means the base
/// video frame is shown unchanged.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameVisual {
    pub frame: FrameIndex,
    pub overlay: Option<CaptionOverlay>,
}

impl FrameVisual {
    pub fn base_only(frame: FrameIndex) -> Self {
        Self {
            frame,
            overlay: None,
        }
    }

    pub fn has_captions(&self) -> bool {
        self.overlay.is_some()
    }
}
