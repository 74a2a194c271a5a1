//! Pure interpolators for animatable value types
//!
//! All interpolation here is unclamped: a curve weight below 0 or above 1
//! extrapolates past the endpoints, for every supported type. That is what
//! makes overshoot curves work.

use glam::{Quat, Vec3};

/// Types a [`Tween`](crate::Tween) can drive.
///
/// `lerp` is pure and stateless; `t = 0` returns `from`, `t = 1` returns
/// `to`, anything outside extrapolates.
pub trait Animatable: Clone + PartialEq + 'static {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self;
}

impl Animatable for f32 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Animatable for Vec3 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        *from + (*to - *from) * t
    }
}

/// Componentwise on the quaternion representation, renormalized afterwards.
/// Deliberately not shortest-path corrected: a rotation authored through the
/// long way around stays on the long way around.
impl Animatable for Quat {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        (*from + (*to - *from) * t).normalize()
    }
}

/// An RGBA color with linear channels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Animatable for Color {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Color {
            r: from.r + (to.r - from.r) * t,
            g: from.g + (to.g - from.g) * t,
            b: from.b + (to.b - from.b) * t,
            a: from.a + (to.a - from.a) * t,
        }
    }
}
