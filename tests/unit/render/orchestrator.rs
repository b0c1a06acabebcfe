use std::{path::Path, sync::Mutex};

use super::*;
use crate::{
    foundation::core::{Canvas, FrameRange},
    render::CompositionHandle,
    style::CaptionStyle,
};

#[derive(Default)]
struct RecordingRenderer {
    renders: Mutex<Vec<(String, FrameRange, Codec, PathBuf)>>,
    fail_with: Option<&'static str>,
}

impl Renderer for RecordingRenderer {
    fn select_composition(
        &self,
        _serve: &ServeLocation,
        composition_id: &str,
        props: &CaptionedVideo,
    ) -> CaptionResult<CompositionHandle> {
        Ok(CompositionHandle {
            id: composition_id.to_string(),
            canvas: Canvas {
                width: 1080,
                height: 1920,
            },
            fps: props.fps,
            duration_in_frames: props.duration_in_frames,
        })
    }

    fn render_media(
        &self,
        composition: &CompositionHandle,
        _serve: &ServeLocation,
        codec: Codec,
        output_path: &Path,
        _props: &CaptionedVideo,
    ) -> CaptionResult<RenderStats> {
        if let Some(msg) = self.fail_with {
            return Err(CaptionError::render(msg));
        }
        self.renders.lock().unwrap().push((
            composition.id.clone(),
            composition.frame_range(),
            codec,
            output_path.to_path_buf(),
        ));
        Ok(RenderStats {
            frames_total: composition.duration_in_frames,
            frames_rendered: composition.duration_in_frames,
            frames_elided: 0,
        })
    }
}

fn orchestrator(renderer: Arc<RecordingRenderer>) -> RenderOrchestrator {
    let serve = ServeLocation::new(
        "build",
        "public",
        Arc::new(usvg::fontdb::Database::new()),
    );
    RenderOrchestrator::new(Arc::new(serve), renderer, OrchestratorSettings::default())
}

fn request(json: &str) -> RenderRequest {
    serde_json::from_str(json).unwrap()
}

const HI: &str = r#"{"video_file":"clip.mp4","data_subtitles":[[{"word":"hi","start":0,"end":23}]],
    "fps":24,"durationInFrames":120,"subtitle_type":"typing_reveal"}"#;

#[test]
fn valid_request_renders_all_frames_once() {
    let renderer = Arc::new(RecordingRenderer::default());
    let out = orchestrator(renderer.clone()).render(request(HI)).unwrap();

    assert_eq!(out.output_location, "out/clip.mp4");
    assert_eq!(out.stats.frames_total, 120);

    let renders = renderer.renders.lock().unwrap();
    assert_eq!(renders.len(), 1);
    let (id, range, codec, path) = &renders[0];
    assert_eq!(id, "CaptionedVideo");
    assert_eq!(range.start.0, 0);
    assert_eq!(range.end.0, 120);
    assert_eq!(*codec, Codec::H264);
    assert_eq!(path, &PathBuf::from("out/clip.mp4"));
}

#[test]
fn each_missing_or_falsy_field_is_rejected_before_rendering() {
    let cases = [
        r#"{"data_subtitles":[],"fps":24,"durationInFrames":1}"#,
        r#"{"video_file":"","data_subtitles":[],"fps":24,"durationInFrames":1}"#,
        r#"{"video_file":"a.mp4","fps":24,"durationInFrames":1}"#,
        r#"{"video_file":"a.mp4","data_subtitles":null,"fps":24,"durationInFrames":1}"#,
        r#"{"video_file":"a.mp4","data_subtitles":[],"durationInFrames":1}"#,
        r#"{"video_file":"a.mp4","data_subtitles":[],"fps":0,"durationInFrames":1}"#,
        r#"{"video_file":"a.mp4","data_subtitles":[],"fps":24}"#,
        r#"{"video_file":"a.mp4","data_subtitles":[],"fps":24,"durationInFrames":0}"#,
    ];
    let renderer = Arc::new(RecordingRenderer::default());
    let orch = orchestrator(renderer.clone());
    for case in cases {
        let err = orch.render(request(case)).unwrap_err();
        assert!(err.is_validation(), "{case}");
        assert_eq!(err.to_string(), format!("validation error: {MISSING_INPUT}"));
    }
    assert!(renderer.renders.lock().unwrap().is_empty());
}

#[test]
fn unsafe_video_paths_are_validation_faults() {
    let req = RenderRequest {
        video_file: Some("../../etc/passwd".to_string()),
        ..request(HI)
    };
    let err = req.validate().unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn empty_caption_list_and_missing_style_still_validate() {
    let props = request(r#"{"video_file":"a.mp4","data_subtitles":[],"fps":30,"durationInFrames":90}"#)
        .validate()
        .unwrap();
    assert!(props.groups.is_empty());
    assert_eq!(props.style.style(), None);
}

#[test]
fn flat_subtitles_become_single_word_groups_with_ordinals() {
    let props = request(
        r#"{"video_file":"a.mp4","fps":30,"durationInFrames":90,"subtitle_type":"glowing",
            "data_subtitles":[{"word":"big news","start":0,"end":10},{"word":"today","start":11,"end":20}]}"#,
    )
    .validate()
    .unwrap();
    assert_eq!(props.style.style(), Some(CaptionStyle::Glow));
    assert_eq!(props.groups.len(), 2);
    assert_eq!(props.groups[1].words()[0].index, Some(1));
}

#[test]
fn renderer_faults_propagate_unchanged() {
    let renderer = Arc::new(RecordingRenderer {
        fail_with: Some("encoder exploded"),
        ..Default::default()
    });
    let err = orchestrator(renderer).render(request(HI)).unwrap_err();
    assert!(!err.is_validation());
    assert!(err.to_string().contains("encoder exploded"));
}
