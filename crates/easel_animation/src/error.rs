use thiserror::Error;

/// Construction-time failures for curves and tween tasks.
///
/// These are hard failures by policy: a malformed curve or a non-positive
/// speed would produce an undefined or unbounded animation, so construction
/// fails before anything reaches the scheduler and nothing is silently
/// normalized.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    #[error("curve needs at least two control points")]
    CurveTooShort,

    #[error("curve must start at (0, 0): first control point is ({time}, {value})")]
    CurveStart { time: f32, value: f32 },

    #[error("curve must end at (1, 1): last control point is ({time}, {value})")]
    CurveEnd { time: f32, value: f32 },

    #[error("speed {0} can never reach completion; speed must be greater than zero")]
    NonPositiveSpeed(f32),
}
