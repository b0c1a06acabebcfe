use crate::{
    animation::interpolate::Ramp,
    foundation::core::{FrameIndex, Rgba8},
    style::{
        CaptionStrategy,
        visual::{Highlight, TextShadow, Typography, WordVisual},
    },
    timing::model::{CaptionGroup, Word},
};

pub const HIGHLIGHT: Rgba8 = Rgba8::rgb(0x76, 0x4d, 0xea);
pub const GROW_FRAMES: i64 = 5;
pub const GROW_TO_SCALE: f64 = 1.08;

/// White uppercase words; the word being spoken sits on a purple box that grows slightly while
/// the text itself stays put.
pub struct BackgroundTrackingCaption;

pub fn highlight_scale(word: &Word, frame: FrameIndex) -> f64 {
    if !word.is_active(frame) {
        return 1.0;
    }
    Ramp::linear(word.start, GROW_FRAMES, 1.0, GROW_TO_SCALE)
        .clamp_right()
        .sample(frame)
}

impl CaptionStrategy for BackgroundTrackingCaption {
    fn typography(&self) -> Typography {
        Typography {
            font_family: "Poppins".to_string(),
            font_size_px: 55.0,
            font_weight: 700,
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
                let active = word.is_active(frame);
                WordVisual {
                    highlight: active.then_some(Highlight {
                        color: HIGHLIGHT,
                        corner_radius_px: 10.0,
                        pad_x_px: 3.0,
                        pad_y_px: 1.0,
                        scale: highlight_scale(word, frame),
                    }),
                    shadows: vec![TextShadow::drop()],
                    ..WordVisual::plain(word.word.to_uppercase(), active, Rgba8::WHITE)
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/background.rs"]
mod tests;
