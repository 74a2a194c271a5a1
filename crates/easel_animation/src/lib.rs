//! Easel Animation Engine
//!
//! Curve-shaped tween tasks driven by a cooperative tick scheduler.
//!
//! # Features
//!
//! - **Shaping Curves**: Hermite control points from (0, 0) to (1, 1), with
//!   deliberate interior overshoot for bounce effects
//! - **Tweens**: cancellable, restartable per-tick tasks over scalars,
//!   vectors, rotations, and colors
//! - **Task Slots**: one live writer per animated property, restart-safe
//! - **Two Tick Lanes**: per-frame and fixed-step, chosen per task

pub mod curve;
pub mod error;
pub mod interpolate;
pub mod scheduler;
pub mod slot;
pub mod task;

pub use curve::{ControlPoint, Curve};
pub use error::AnimationError;
pub use interpolate::{Animatable, Color};
pub use scheduler::{Scheduler, TaskId, TickLane};
pub use slot::TaskSlot;
pub use task::{StepMode, TaskStatus, Tween};
