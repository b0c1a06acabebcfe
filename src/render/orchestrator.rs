use std::{path::PathBuf, sync::Arc};

use crate::{
    compose::selector::{COMPOSITION_ID, CaptionedVideo},
    encode::ffmpeg::Codec,
    foundation::{
        core::Fps,
        error::{CaptionError, CaptionResult},
    },
    render::{RenderStats, Renderer, ServeLocation, serve::normalize_rel_path},
    style::StyleChoice,
    timing::model::CaptionTrack,
};

pub const MISSING_INPUT: &str = "Missing required input properties";

/// Body of `POST /caption-video`. Every field is optional on the wire so that missing values
/// surface as one validation fault instead of a parse error.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub video_file: Option<String>,
    #[serde(default)]
    pub data_subtitles: Option<CaptionTrack>,
    #[serde(default)]
    pub fps: Option<u32>,
    #[serde(default, rename = "durationInFrames")]
    pub duration_in_frames: Option<u64>,
    #[serde(default)]
    pub subtitle_type: Option<StyleChoice>,
}

impl RenderRequest {
    /// Check required fields and turn the request into composition input props.
    ///
    /// `video_file` must be a non-empty safe relative path; `fps` and `durationInFrames` must be
    /// non-zero. A missing style is accepted and renders without captions.
    pub fn validate(self) -> CaptionResult<CaptionedVideo> {
        let missing = || CaptionError::validation(MISSING_INPUT);

        let video_file = self
            .video_file
            .filter(|v| !v.is_empty())
            .ok_or_else(missing)?;
        let track = self.data_subtitles.ok_or_else(missing)?;
        let fps = self.fps.filter(|&f| f != 0).ok_or_else(missing)?;
        let duration_in_frames = self
            .duration_in_frames
            .filter(|&d| d != 0)
            .ok_or_else(missing)?;

        Ok(CaptionedVideo {
            video_file: normalize_rel_path(&video_file)?,
            groups: track.into_groups(),
            fps: Fps::new(fps)?,
            duration_in_frames,
            style: self
                .subtitle_type
                .unwrap_or_else(|| StyleChoice::Unrecognized(String::new())),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutput {
    pub output_location: String,
    pub stats: RenderStats,
}

#[derive(Clone, Debug)]
pub struct OrchestratorSettings {
    pub output_dir: PathBuf,
    pub codec: Codec,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("out"),
            codec: Codec::H264,
        }
    }
}

/// Validates requests and drives the renderer over the whole composition.
///
/// Holds the serve location produced at startup; there is no way to build an orchestrator
/// without one, and renders never rebundle.
pub struct RenderOrchestrator {
    serve: Arc<ServeLocation>,
    renderer: Arc<dyn Renderer>,
    settings: OrchestratorSettings,
}

impl RenderOrchestrator {
    pub fn new(
        serve: Arc<ServeLocation>,
        renderer: Arc<dyn Renderer>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            serve,
            renderer,
            settings,
        }
    }

    pub fn serve_location(&self) -> &ServeLocation {
        &self.serve
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    pub fn render(&self, request: RenderRequest) -> CaptionResult<RenderOutput> {
        let props = request.validate()?;
        self.render_props(&props)
    }

    #[tracing::instrument(skip_all, fields(video_file = %props.video_file, style = ?props.style))]
    pub fn render_props(&self, props: &CaptionedVideo) -> CaptionResult<RenderOutput> {
        let composition = self
            .renderer
            .select_composition(&self.serve, COMPOSITION_ID, props)?;

        let output_path = self.settings.output_dir.join(&props.video_file);
        tracing::info!(
            frames = composition.duration_in_frames,
            fps = composition.fps.get(),
            codec = %self.settings.codec,
            out = %output_path.display(),
            "render started"
        );

        let stats = self.renderer.render_media(
            &composition,
            &self.serve,
            self.settings.codec,
            &output_path,
            props,
        )?;

        Ok(RenderOutput {
            output_location: output_path.to_string_lossy().into_owned(),
            stats,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/orchestrator.rs"]
mod tests;
