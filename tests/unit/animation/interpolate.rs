use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn linear_ramp_interpolates_inside_window() {
    let r = Ramp::linear(FrameIndex(10), 5, 1.0, 2.0);
    assert!(close(r.sample(FrameIndex(10)), 1.0));
    assert!(close(r.sample(FrameIndex(12)), 1.4));
    assert!(close(r.sample(FrameIndex(15)), 2.0));
}

#[test]
fn extend_keeps_the_slope_outside_the_window() {
    let r = Ramp::linear(FrameIndex(0), 10, 0.0, 1.0);
    assert!(close(r.sample(FrameIndex(-5)), -0.5));
    assert!(close(r.sample(FrameIndex(20)), 2.0));
}

#[test]
fn clamping_is_per_side() {
    let right_only = Ramp::linear(FrameIndex(0), 10, 0.0, 1.0).clamp_right();
    assert!(close(right_only.sample(FrameIndex(-5)), -0.5));
    assert!(close(right_only.sample(FrameIndex(20)), 1.0));

    let both = Ramp::linear(FrameIndex(0), 10, 0.0, 1.0).clamped();
    assert!(close(both.sample(FrameIndex(-5)), 0.0));
    assert!(close(both.sample(FrameIndex(20)), 1.0));
}

#[test]
fn zero_length_range_is_a_step() {
    assert_eq!(
        progress(4.0, 5.0, 5.0, Extrapolate::Extend, Extrapolate::Extend),
        0.0
    );
    assert_eq!(
        progress(5.0, 5.0, 5.0, Extrapolate::Extend, Extrapolate::Extend),
        1.0
    );
}
