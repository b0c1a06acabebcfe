use crate::{
    animation::interpolate::Ramp,
    foundation::core::{FrameIndex, Rgba8},
    style::{
        CaptionStrategy,
        visual::{TextShadow, Typography, WordVisual},
    },
    timing::model::CaptionGroup,
};

pub const PALETTE: [Rgba8; 5] = [
    Rgba8::rgb(0xb6, 0xe2, 0x43), // conifer
    Rgba8::rgb(0x43, 0xd2, 0xe2), // picton blue
    Rgba8::rgb(0x00, 0xff, 0x00),
    Rgba8::rgb(0xff, 0xff, 0x00),
    Rgba8::rgb(0xff, 0xff, 0xff),
];

/// Every n-th word (by transcript ordinal) pops in.
pub const POP_EVERY: u32 = 4;
pub const POP_FRAMES: i64 = 3;
pub const POP_FROM_SCALE: f64 = 0.5;

/// Large italic words in a cycling palette with a neon glow; every fourth word pops in from
/// half size over its first three frames.
pub struct GlowCaption;

pub fn palette_color(index: u32) -> Rgba8 {
    PALETTE[(index as usize) % PALETTE.len()]
}

pub fn pop_scale(index: u32, start: FrameIndex, frame: FrameIndex) -> f64 {
    if index % POP_EVERY != 0 {
        return 1.0;
    }
    Ramp::linear(start, POP_FRAMES, POP_FROM_SCALE, 1.0)
        .clamped()
        .sample(frame)
}

impl CaptionStrategy for GlowCaption {
    fn typography(&self) -> Typography {
        Typography {
            font_family: "Crimson Text".to_string(),
            font_size_px: 120.0,
            font_weight: 400,
            italic: true,
            bottom_px: 150.0,
            word_gap_px: 0.0,
        }
    }

    fn render(&self, group: &CaptionGroup, frame: FrameIndex) -> Vec<WordVisual> {
        group
            .words()
            .iter()
            .enumerate()
            .map(|(pos, word)| {
                let index = word.index.unwrap_or(pos as u32);
                let color = palette_color(index);
                WordVisual {
                    scale: pop_scale(index, word.start, frame),
                    shadows: vec![
                        TextShadow::drop(),
                        TextShadow::glow(40.0, color),
                        TextShadow::glow(50.0, color),
                        TextShadow::glow(60.0, color),
                    ],
                    ..WordVisual::plain(word.word.clone(), word.is_active(frame), color)
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/glow.rs"]
mod tests;
