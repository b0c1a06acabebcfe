use rayon::prelude::*;

use crate::{
    foundation::core::{FrameIndex, FrameRange, Fps},
    style::{StyleChoice, visual::FrameVisual},
    timing::model::{CaptionGroup, active_group_position},
};

/// Name under which renderers look up the captioned-video composition.
pub const COMPOSITION_ID: &str = "CaptionedVideo";

/// Input properties of the captioned-video composition: a base video plus one caption style
/// applied to an ordered list of caption groups.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionedVideo {
    pub video_file: String,
    #[serde(rename = "data_subtitles")]
    pub groups: Vec<CaptionGroup>,
    pub fps: Fps,
    #[serde(rename = "durationInFrames")]
    pub duration_in_frames: u64,
    #[serde(rename = "subtitle_type")]
    pub style: StyleChoice,
}

impl CaptionedVideo {
    /// Every output frame: `[0, duration_in_frames)`.
    pub fn frame_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(i64::try_from(self.duration_in_frames).unwrap_or(i64::MAX)),
        }
    }

    pub fn select_and_render(&self, frame: FrameIndex) -> FrameVisual {
        select_and_render(self, frame)
    }

    /// Evaluate a span of frames in parallel; results come back in frame order.
    #[tracing::instrument(skip(self), fields(style = ?self.style))]
    pub fn evaluate_range(&self, range: FrameRange) -> Vec<FrameVisual> {
        let start = range.start;
        (0..range.len_frames() as usize)
            .into_par_iter()
            .map(|i| self.select_and_render(start.offset(i as i64)))
            .collect()
    }
}

/// Caption layer for `frame`: nothing when no group is on screen or the style is unknown,
/// otherwise the selected style's rendering of the active group.
pub fn select_and_render(comp: &CaptionedVideo, frame: FrameIndex) -> FrameVisual {
    let Some(style) = comp.style.style() else {
        return FrameVisual::base_only(frame);
    };
    let Some(position) = active_group_position(&comp.groups, frame) else {
        return FrameVisual::base_only(frame);
    };

    FrameVisual {
        frame,
        overlay: Some(style.render(&comp.groups[position], position, frame)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/selector.rs"]
mod tests;
