use super::*;
use crate::timing::model::Word;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn word(index: u32, start: i64, end: i64) -> Word {
    Word::new("neon", FrameIndex(start), FrameIndex(end))
        .unwrap()
        .with_index(index)
}

#[test]
fn qualifying_word_pops_from_half_size_over_three_frames() {
    assert!(close(pop_scale(8, FrameIndex(20), FrameIndex(20)), 0.5));
    assert!(close(pop_scale(8, FrameIndex(20), FrameIndex(21)), 0.5 + 0.5 / 3.0));
    assert!(close(pop_scale(8, FrameIndex(20), FrameIndex(23)), 1.0));
    assert!(close(pop_scale(8, FrameIndex(20), FrameIndex(40)), 1.0));
    // clamped before the word starts
    assert!(close(pop_scale(8, FrameIndex(20), FrameIndex(10)), 0.5));
}

#[test]
fn non_qualifying_word_is_always_full_size() {
    for f in [0, 19, 20, 21, 23, 100] {
        assert_eq!(pop_scale(9, FrameIndex(20), FrameIndex(f)), 1.0);
    }
}

#[test]
fn palette_cycles_by_index_regardless_of_activity() {
    let group = CaptionGroup::new(vec![word(5, 0, 4), word(6, 5, 9)]).unwrap();
    let visuals = GlowCaption.render(&group, FrameIndex(2));
    assert_eq!(visuals[0].color, PALETTE[0]);
    assert_eq!(visuals[1].color, PALETTE[1]);
    assert!(visuals[0].active);
    assert!(!visuals[1].active);
    assert_eq!(palette_color(14), PALETTE[4]);
}

#[test]
fn glow_shadows_follow_word_color() {
    let group = CaptionGroup::new(vec![word(1, 0, 4)]).unwrap();
    let v = &GlowCaption.render(&group, FrameIndex(0))[0];
    assert_eq!(v.shadows.len(), 4);
    assert!(v.shadows[1..].iter().all(|s| s.color == PALETTE[1]));
    assert_eq!(v.text, "neon");
}

#[test]
fn missing_index_falls_back_to_position_in_group() {
    let group = CaptionGroup::new(vec![
        Word::new("a", FrameIndex(10), FrameIndex(12)).unwrap(),
        Word::new("b", FrameIndex(13), FrameIndex(15)).unwrap(),
    ])
    .unwrap();
    let v = GlowCaption.render(&group, FrameIndex(10));
    assert!(close(v[0].scale, 0.5));
    assert_eq!(v[1].scale, 1.0);
}
