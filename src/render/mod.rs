//! Collaborators that turn a validated render request into a video file.
//!
//! The caption core never touches the filesystem; everything IO-bound sits behind the
//! [`Bundler`] and [`Renderer`] traits so the orchestrator can be driven by test doubles.

pub mod bundle;
pub mod ffmpeg_renderer;
pub mod orchestrator;
pub mod serve;

use std::path::Path;

use crate::{
    compose::selector::CaptionedVideo,
    encode::ffmpeg::Codec,
    foundation::{
        core::{Canvas, FrameIndex, FrameRange, Fps},
        error::CaptionResult,
    },
};

pub use serve::ServeLocation;

/// Prepares the servable asset location once at startup.
pub trait Bundler: Send + Sync {
    fn bundle(&self, entry_point: &Path, out_dir: &Path) -> CaptionResult<ServeLocation>;
}

pub trait Renderer: Send + Sync {
    /// Resolve `composition_id` against the bundle with the given input props.
    fn select_composition(
        &self,
        serve: &ServeLocation,
        composition_id: &str,
        props: &CaptionedVideo,
    ) -> CaptionResult<CompositionHandle>;

    /// Render every frame of `composition` into `output_path`.
    fn render_media(
        &self,
        composition: &CompositionHandle,
        serve: &ServeLocation,
        codec: Codec,
        output_path: &Path,
        props: &CaptionedVideo,
    ) -> CaptionResult<RenderStats>;
}

/// A resolved composition: what will be rendered, at which size and rate.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CompositionHandle {
    pub id: String,
    pub canvas: Canvas,
    pub fps: Fps,
    pub duration_in_frames: u64,
}

impl CompositionHandle {
    pub fn frame_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(i64::try_from(self.duration_in_frames).unwrap_or(i64::MAX)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderStats {
    pub frames_total: u64,
    pub frames_rendered: u64,
    pub frames_elided: u64,
}
