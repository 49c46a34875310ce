// extensions/easing.rs
//
// Easing curves and the interpolation trait tweens are generic over.

use glam::Vec2;
use std::f32::consts::PI;

use crate::render::color::Color;

/// Easing curve kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant rate.
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    SineInOut,
    /// Fast start, long tail. Used for fades.
    ExpoOut,
    /// Overshoot then settle.
    BackOut,
    /// Bouncy finish.
    BounceOut,
}

impl Easing {
    /// Map normalized time `t` (clamped to [0, 1]) to eased progress.
    /// Endpoints are exact: `apply(0) == 0`, `apply(1) == 1`.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t).powi(2),
            Easing::QuadInOut => in_out(t, 2),
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => in_out(t, 3),
            Easing::SineInOut => (1.0 - (PI * t).cos()) / 2.0,
            Easing::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
            Easing::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                let u = t - 1.0;
                1.0 + C3 * u * u * u + C1 * u * u
            }
            Easing::BounceOut => bounce_out(t),
        }
    }
}

/// Symmetric polynomial ease-in-out of the given degree.
#[inline]
fn in_out(t: f32, degree: i32) -> f32 {
    if t < 0.5 {
        2.0_f32.powi(degree - 1) * t.powi(degree)
    } else {
        1.0 - (2.0 - 2.0 * t).powi(degree) / 2.0
    }
}

#[inline]
fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

/// Values a tween can interpolate.
pub trait Lerp: Copy {
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
        a + (b - a) * t
    }
}

impl Lerp for Color {
    #[inline]
    fn lerp(a: Color, b: Color, t: f32) -> Color {
        let mix = <f32 as Lerp>::lerp;
        Color::new(mix(a.r, b.r, t), mix(a.g, b.g, t), mix(a.b, b.b, t), mix(a.a, b.a, t))
    }
}

/// Interpolate from `a` to `b` at progress `t` shaped by `easing`.
#[inline]
pub fn ease<T: Lerp>(a: T, b: T, t: f32, easing: Easing) -> T {
    T::lerp(a, b, easing.apply(t))
}
