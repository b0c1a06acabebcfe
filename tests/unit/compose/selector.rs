use super::*;
use crate::{
    style::CaptionStyle,
    timing::model::{CaptionTrack, Word},
};

fn comp(style: &str) -> CaptionedVideo {
    let track: CaptionTrack = serde_json::from_str(
        r#"[[{"word":"hello","start":0,"end":9},{"word":"world","start":10,"end":19}],
            [{"word":"again","start":30,"end":39}]]"#,
    )
    .unwrap();
    CaptionedVideo {
        video_file: "clip.mp4".to_string(),
        groups: track.into_groups(),
        fps: Fps::new(30).unwrap(),
        duration_in_frames: 60,
        style: StyleChoice::from_tag(style),
    }
}

#[test]
fn frames_outside_every_window_show_base_video_only() {
    let c = comp("background_tracking");
    for f in [20, 25, 29, 40, 59] {
        let v = c.select_and_render(FrameIndex(f));
        assert_eq!(v, FrameVisual::base_only(FrameIndex(f)));
    }
}

#[test]
fn active_group_is_dispatched_to_the_selected_style() {
    let c = comp("color_tracking");
    let v = c.select_and_render(FrameIndex(12));
    let overlay = v.overlay.expect("group 0 is on screen");
    assert_eq!(overlay.style, CaptionStyle::ColorTracking);
    assert_eq!(overlay.group, 0);
    assert_eq!(
        overlay.words.iter().map(|w| w.active).collect::<Vec<_>>(),
        vec![false, true]
    );

    let later = c.select_and_render(FrameIndex(35)).overlay.unwrap();
    assert_eq!(later.group, 1);
    assert_eq!(later.words[0].text, "AGAIN");
}

#[test]
fn unknown_style_never_draws_captions() {
    let c = comp("comic_sans");
    for f in 0..60 {
        assert!(!c.select_and_render(FrameIndex(f)).has_captions());
    }
}

#[test]
fn parallel_range_matches_sequential_evaluation() {
    let c = comp("typing_background");
    let par = c.evaluate_range(c.frame_range());
    let seq: Vec<_> = c.frame_range().iter().map(|f| c.select_and_render(f)).collect();
    assert_eq!(par.len(), 60);
    assert_eq!(par, seq);
}

#[test]
fn props_use_wire_field_names() {
    let c = CaptionedVideo {
        groups: vec![CaptionGroup::single(
            Word::new("hi", FrameIndex(0), FrameIndex(23)).unwrap(),
        )],
        ..comp("typing_reveal")
    };
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json["video_file"], "clip.mp4");
    assert_eq!(json["durationInFrames"], 60);
    assert_eq!(json["subtitle_type"], "typing_reveal");
    assert_eq!(json["data_subtitles"][0][0]["word"], "hi");
}
