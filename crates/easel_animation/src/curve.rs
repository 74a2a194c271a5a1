//! Shaping curves for tween interpolation
//!
//! A curve maps normalized progress (0.0 to 1.0) to an interpolation weight.
//! Curves must start at (0, 0) and end at (1, 1); interior control points may
//! leave [0, 1] to produce overshoot and bounce effects.

use std::rc::Rc;

use crate::error::AnimationError;

/// A single Hermite control point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPoint {
    /// Normalized time position.
    pub time: f32,
    /// Curve value at this time.
    pub value: f32,
    /// Slope approaching this point.
    pub in_tangent: f32,
    /// Slope leaving this point.
    pub out_tangent: f32,
}

impl ControlPoint {
    /// A control point with flat tangents.
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }

    pub fn with_tangents(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }
}

/// A shaping curve evaluated with cubic Hermite segments.
///
/// Immutable once constructed; share one instance across many tweens with
/// [`Rc`].
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    points: Vec<ControlPoint>,
}

impl Curve {
    /// Validates and builds a curve from control points ordered by time.
    ///
    /// Fails if there are fewer than two points or the endpoints deviate
    /// from (0, 0) and (1, 1).
    pub fn new(points: Vec<ControlPoint>) -> Result<Self, AnimationError> {
        if points.len() < 2 {
            return Err(AnimationError::CurveTooShort);
        }
        let first = points[0];
        if first.time != 0.0 || first.value != 0.0 {
            return Err(AnimationError::CurveStart {
                time: first.time,
                value: first.value,
            });
        }
        let last = points[points.len() - 1];
        if last.time != 1.0 || last.value != 1.0 {
            return Err(AnimationError::CurveEnd {
                time: last.time,
                value: last.value,
            });
        }
        Ok(Self { points })
    }

    /// Straight line from (0, 0) to (1, 1).
    pub fn linear() -> Self {
        Self {
            points: vec![
                ControlPoint::with_tangents(0.0, 0.0, 1.0, 1.0),
                ControlPoint::with_tangents(1.0, 1.0, 1.0, 1.0),
            ],
        }
    }

    /// Smooth ease-in-out from (0, 0) to (1, 1).
    ///
    /// The default shaping for tweens constructed without an explicit curve.
    pub fn ease_in_out() -> Self {
        Self {
            points: vec![ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 1.0)],
        }
    }

    /// Overshoots past 1 around three quarters in, then settles back to 1.
    pub fn ease_out_back() -> Self {
        Self {
            points: vec![
                ControlPoint::with_tangents(0.0, 0.0, 0.0, 2.6),
                ControlPoint::new(0.7, 1.1),
                ControlPoint::new(1.0, 1.0),
            ],
        }
    }

    pub fn into_shared(self) -> Rc<Curve> {
        Rc::new(self)
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Evaluate the curve weight at normalized progress `t`.
    ///
    /// `t` is clamped to the curve domain; the weight itself is not clamped
    /// and may leave [0, 1] on interior segments.
    pub fn evaluate(&self, t: f32) -> f32 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        let mut segment = (first, last);
        for pair in self.points.windows(2) {
            if t < pair[1].time {
                segment = (pair[0], pair[1]);
                break;
            }
        }
        let (p0, p1) = segment;

        let width = p1.time - p0.time;
        if width <= f32::EPSILON {
            return p1.value;
        }
        let s = (t - p0.time) / width;

        // Cubic Hermite basis; tangents are scaled to the segment width.
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        h00 * p0.value + h10 * width * p0.out_tangent + h01 * p1.value + h11 * width * p1.in_tangent
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::ease_in_out()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_points_rejected() {
        assert_eq!(
            Curve::new(vec![ControlPoint::new(0.0, 0.0)]),
            Err(AnimationError::CurveTooShort)
        );
        assert_eq!(Curve::new(Vec::new()), Err(AnimationError::CurveTooShort));
    }

    #[test]
    fn test_bad_endpoints_rejected() {
        let err = Curve::new(vec![
            ControlPoint::new(0.1, 0.0),
            ControlPoint::new(1.0, 1.0),
        ]);
        assert_eq!(
            err,
            Err(AnimationError::CurveStart {
                time: 0.1,
                value: 0.0
            })
        );

        let err = Curve::new(vec![
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(1.0, 0.9),
        ]);
        assert_eq!(
            err,
            Err(AnimationError::CurveEnd {
                time: 1.0,
                value: 0.9
            })
        );
    }

    fn assert_valid(curve: &Curve) {
        Curve::new(curve.control_points().to_vec()).unwrap();
    }

    #[test]
    fn test_presets_are_valid() {
        assert_valid(&Curve::linear());
        assert_valid(&Curve::ease_in_out());
        assert_valid(&Curve::ease_out_back());
    }

    #[test]
    fn test_linear_is_identity() {
        let curve = Curve::linear();
        for t in [0.0, 0.125, 0.25, 0.5, 0.75, 1.0] {
            assert!((curve.evaluate(t) - t).abs() < 1e-5, "t = {t}");
        }
    }

    #[test]
    fn test_ease_in_out_shape() {
        let curve = Curve::ease_in_out();
        assert_eq!(curve.evaluate(0.0), 0.0);
        assert_eq!(curve.evaluate(1.0), 1.0);
        // Flat tangents give the smoothstep midpoint.
        assert!((curve.evaluate(0.5) - 0.5).abs() < 1e-5);
        // Slow start, fast middle.
        assert!(curve.evaluate(0.25) < 0.25);
        assert!(curve.evaluate(0.75) > 0.75);
    }

    #[test]
    fn test_overshoot_exceeds_one_inside_domain() {
        let curve = Curve::ease_out_back();
        let peak = (1..100)
            .map(|i| curve.evaluate(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
        assert_eq!(curve.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_evaluation_clamped_to_domain() {
        let curve = Curve::ease_in_out();
        assert_eq!(curve.evaluate(-0.5), 0.0);
        assert_eq!(curve.evaluate(1.5), 1.0);
    }
}
