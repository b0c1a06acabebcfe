use crate::{
    foundation::core::{FrameIndex, Rgba8},
    style::{
        CaptionStrategy,
        visual::{TextShadow, Typography, WordVisual},
    },
    timing::model::CaptionGroup,
};

pub const YELLOW: Rgba8 = Rgba8::rgb(0xff, 0xff, 0x00);

/// Condensed uppercase words; the spoken word lights up with a glow.
pub struct ColorTrackingCaption;

/// Color for the active word at transcript position `index`.
///
/// Keyed by index, but every index currently maps to yellow. A policy painting every fifth
/// word green (`#00ff00`) was sketched and is not enabled.
pub fn highlight_color(_index: Option<u32>) -> Rgba8 {
    YELLOW
}

impl CaptionStrategy for ColorTrackingCaption {
    fn typography(&self) -> Typography {
        Typography {
            font_family: "Bebas Neue".to_string(),
            font_size_px: 90.0,
            font_weight: 400,
            italic: false,
            bottom_px: 150.0,
            word_gap_px: 20.0,
        }
    }

    fn render(&self, group: &CaptionGroup, frame: FrameIndex) -> Vec<WordVisual> {
        group
            .words()
            .iter()
            .map(|word| {
                let text = word.word.to_uppercase();
                if !word.is_active(frame) {
                    return WordVisual::plain(text, false, Rgba8::WHITE);
                }
                let color = highlight_color(word.index);
                WordVisual {
                    shadows: vec![TextShadow::drop(), TextShadow::glow(60.0, color)],
                    ..WordVisual::plain(text, true, color)
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/color_track.rs"]
mod tests;
