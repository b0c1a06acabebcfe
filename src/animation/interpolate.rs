use crate::foundation::core::FrameIndex;

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// What happens when the input falls outside the input range on one side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolate {
    /// Keep following the linear segment past the edge.
    #[default]
    Extend,
    /// Hold the edge value.
    Clamp,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Ramp<T> {
    pub from_frame: FrameIndex,
    pub to_frame: FrameIndex,
    pub from: T,
    pub to: T,
    pub left: Extrapolate,
    pub right: Extrapolate,
}

impl<T> Ramp<T>
where
    T: Lerp + Clone,
{
    /// A linear ramp over `frames` frames starting at `start`, extending on both sides.
    pub fn linear(start: FrameIndex, frames: i64, from: T, to: T) -> Self {
        Self {
            from_frame: start,
            to_frame: start.offset(frames),
            from,
            to,
            left: Extrapolate::Extend,
            right: Extrapolate::Extend,
        }
    }

    pub fn clamp_left(mut self) -> Self {
        self.left = Extrapolate::Clamp;
        self
    }

    pub fn clamp_right(mut self) -> Self {
        self.right = Extrapolate::Clamp;
        self
    }

    pub fn clamped(self) -> Self {
        self.clamp_left().clamp_right()
    }

    pub fn sample(&self, frame: FrameIndex) -> T {
        let t = progress(
            frame.as_f64(),
            self.from_frame.as_f64(),
            self.to_frame.as_f64(),
            self.left,
            self.right,
        );
        T::lerp(&self.from, &self.to, t)
    }
}

/// Normalized position of `x` within `[a, b]`, honoring the extrapolation mode on each side.
///
/// A zero-length range is a step at `b`.
pub fn progress(x: f64, a: f64, b: f64, left: Extrapolate, right: Extrapolate) -> f64 {
    let span = b - a;
    if span == 0.0 {
        return if x >= b { 1.0 } else { 0.0 };
    }

    let t = (x - a) / span;
    if t < 0.0 && left == Extrapolate::Clamp {
        return 0.0;
    }
    if t > 1.0 && right == Extrapolate::Clamp {
        return 1.0;
    }
    t
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;
