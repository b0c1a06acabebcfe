use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn word(start: i64, end: i64) -> Word {
    Word::new("Typed", FrameIndex(start), FrameIndex(end)).unwrap()
}

#[test]
fn opacity_tracks_elapsed_fraction_with_floor() {
    let w = word(0, 10);
    assert!(close(reveal_opacity(&w, FrameIndex(0)), 0.2));
    assert!(close(reveal_opacity(&w, FrameIndex(1)), 0.2));
    assert!(close(reveal_opacity(&w, FrameIndex(5)), 0.5));
    assert!(close(reveal_opacity(&w, FrameIndex(10)), 1.0));
    assert!(close(reveal_opacity(&w, FrameIndex(25)), 1.0));
    assert!(close(reveal_opacity(&w, FrameIndex(-5)), 0.2));
}

#[test]
fn zero_length_word_is_fully_visible() {
    let w = word(5, 5);
    assert_eq!(reveal_opacity(&w, FrameIndex(5)), 1.0);
    assert_eq!(reveal_opacity(&w, FrameIndex(0)), 1.0);
}

#[test]
fn words_render_lowercase_black_on_a_panel() {
    let group = CaptionGroup::new(vec![word(0, 10), word(11, 20)]).unwrap();
    let v = TypingRevealCaption.render(&group, FrameIndex(5));
    assert_eq!(v[0].text, "typed");
    assert_eq!(v[0].color, Rgba8::BLACK);
    assert!(close(v[1].opacity, 0.2));
    assert!(TypingRevealCaption.panel().is_some());
}

#[test]
fn typography_uses_a_book_weight_between_regular_and_medium() {
    let t = TypingRevealCaption.typography();
    assert_eq!(t.font_weight, 420);
    assert_eq!(t.font_size_px, 43.0);
}
