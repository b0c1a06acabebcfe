use crate::{
    foundation::core::{FrameIndex, Rgba8},
    style::{
        CaptionStrategy,
        visual::{Highlight, Typography, WordVisual},
    },
    timing::model::{CaptionGroup, Word},
};

pub const MIN_OPACITY: f64 = 0.2;

/// Black lowercase words on a white strip, each fading in across its own spoken window.
pub struct TypingRevealCaption;

/// Elapsed fraction of the word's window, floored at [`MIN_OPACITY`] and capped at 1.
/// A zero-length word is fully shown.
pub fn reveal_opacity(word: &Word, frame: FrameIndex) -> f64 {
    let span = word.len_frames();
    if span <= 0 {
        return 1.0;
    }
    let progress = (frame.0 - word.start.0) as f64 / span as f64;
    progress.clamp(MIN_OPACITY, 1.0)
}

impl CaptionStrategy for TypingRevealCaption {
    fn typography(&self) -> Typography {
        Typography {
            font_family: "Poppins".to_string(),
            font_size_px: 43.0,
            font_weight: 420,
            italic: false,
            bottom_px: 150.0,
            word_gap_px: 10.0,
        }
    }

    fn panel(&self) -> Option<Highlight> {
        Some(Highlight {
            color: Rgba8::WHITE,
            corner_radius_px: 10.0,
            pad_x_px: 10.0,
            pad_y_px: 1.0,
            scale: 1.0,
        })
    }

    fn render(&self, group: &CaptionGroup, frame: FrameIndex) -> Vec<WordVisual> {
        group
            .words()
            .iter()
            .map(|word| WordVisual {
                opacity: reveal_opacity(word, frame),
                ..WordVisual::plain(word.word.to_lowercase(), word.is_active(frame), Rgba8::BLACK)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/typing.rs"]
mod tests;
