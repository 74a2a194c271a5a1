//! Tween tasks
//!
//! A tween is an explicit state object advanced by the scheduler once per
//! tick: progress moves forward, the curve shapes it, the interpolated value
//! goes out through the sink, and completion fires a callback exactly once.
//! Cancellation is removal from the scheduler; a cancelled tween never
//! writes again and never fires its completion callback.

use std::rc::Rc;

use crate::curve::Curve;
use crate::error::AnimationError;
use crate::interpolate::Animatable;

/// How progress advances per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepMode {
    /// `progress += dt / duration`; the whole tween takes `duration` seconds.
    Duration(f32),
    /// `progress += dt * speed`; higher speed finishes sooner.
    Speed(f32),
}

/// Outcome of advancing a task by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    Done,
}

/// The per-tick work surface the scheduler owns. Implemented by [`Tween`];
/// the scheduler sees nothing else.
pub trait Animate {
    fn advance(&mut self, dt: f32) -> TaskStatus;
}

/// A single interpolation task from a start value to a target value.
pub struct Tween<T: Animatable> {
    start: T,
    target: T,
    mode: StepMode,
    curve: Rc<Curve>,
    progress: f32,
    sink: Box<dyn FnMut(T)>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl<T: Animatable> Tween<T> {
    /// Builds a tween writing interpolated values through `sink`.
    ///
    /// Fails with [`AnimationError::NonPositiveSpeed`] for a speed-based
    /// tween that could never finish; such a tween never reaches the
    /// scheduler.
    pub fn new(
        start: T,
        target: T,
        mode: StepMode,
        sink: impl FnMut(T) + 'static,
    ) -> Result<Self, AnimationError> {
        if let StepMode::Speed(speed) = mode {
            if speed <= 0.0 {
                return Err(AnimationError::NonPositiveSpeed(speed));
            }
        }
        Ok(Self {
            start,
            target,
            mode,
            curve: Rc::new(Curve::ease_in_out()),
            progress: 0.0,
            sink: Box::new(sink),
            on_complete: None,
        })
    }

    /// Fixed-duration tween over `secs` seconds. Infallible: only the
    /// speed-based mode has an invalid configuration.
    pub fn over(start: T, target: T, secs: f32, sink: impl FnMut(T) + 'static) -> Self {
        Self {
            start,
            target,
            mode: StepMode::Duration(secs),
            curve: Rc::new(Curve::ease_in_out()),
            progress: 0.0,
            sink: Box::new(sink),
            on_complete: None,
        }
    }

    /// Replaces the default ease-in-out shaping curve.
    pub fn with_curve(mut self, curve: Rc<Curve>) -> Self {
        self.curve = curve;
        self
    }

    /// Registers the completion callback. It fires once, after the final
    /// write, and never fires for a cancelled tween.
    pub fn on_complete(mut self, on_complete: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    /// True when there is nothing to interpolate: the start already equals
    /// the target, or a fixed duration of zero (or less) leaves no time to
    /// spend. The scheduler completes such tweens synchronously at spawn,
    /// without crossing a frame boundary.
    pub(crate) fn finishes_immediately(&self) -> bool {
        self.start == self.target || matches!(self.mode, StepMode::Duration(d) if d <= 0.0)
    }

    /// Final write plus the completion callback.
    pub(crate) fn finish(&mut self) {
        (self.sink)(self.target.clone());
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
    }
}

impl<T: Animatable> Animate for Tween<T> {
    fn advance(&mut self, dt: f32) -> TaskStatus {
        self.progress += match self.mode {
            StepMode::Duration(duration) => dt / duration,
            StepMode::Speed(speed) => dt * speed,
        };

        if self.progress >= 1.0 {
            // The final write is exactly the target, never the accumulated
            // float approximation.
            self.finish();
            return TaskStatus::Done;
        }

        let weight = self.curve.evaluate(self.progress);
        (self.sink)(T::lerp(&self.start, &self.target, weight));
        TaskStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_non_positive_speed_rejected() {
        let err = Tween::new(0.0f32, 1.0, StepMode::Speed(-1.0), |_| ());
        assert!(matches!(err, Err(AnimationError::NonPositiveSpeed(s)) if s == -1.0));
        let err = Tween::new(0.0f32, 1.0, StepMode::Speed(0.0), |_| ());
        assert!(matches!(err, Err(AnimationError::NonPositiveSpeed(_))));
    }

    #[test]
    fn test_fixed_duration_ticks_to_exact_target() {
        let writes = Rc::new(RefCell::new(Vec::new()));
        let completions = Rc::new(Cell::new(0u32));

        let sink = Rc::clone(&writes);
        let done = Rc::clone(&completions);
        let mut tween = Tween::over(0.0f32, 1.0, 1.0, move |v| sink.borrow_mut().push(v))
            .on_complete(move || done.set(done.get() + 1));

        for _ in 0..3 {
            assert_eq!(tween.advance(0.25), TaskStatus::Running);
        }
        // Fourth tick lands exactly on the boundary and completes.
        assert_eq!(tween.advance(0.25), TaskStatus::Done);

        let writes = writes.borrow();
        assert_eq!(writes.len(), 4);
        assert_eq!(*writes.last().unwrap(), 1.0);
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn test_ease_in_out_shapes_intermediate_writes() {
        let writes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&writes);
        let mut tween = Tween::over(0.0f32, 1.0, 1.0, move |v| sink.borrow_mut().push(v));

        tween.advance(0.25);
        tween.advance(0.25);

        let writes = writes.borrow();
        // smoothstep(0.25) and smoothstep(0.5)
        assert!((writes[0] - 0.15625).abs() < 1e-5);
        assert!((writes[1] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_speed_mode_progress_rate() {
        let last = Rc::new(Cell::new(f32::NAN));
        let sink = Rc::clone(&last);
        let mut tween = Tween::new(0.0f32, 1.0, StepMode::Speed(2.0), move |v| sink.set(v))
            .unwrap()
            .with_curve(Curve::linear().into_shared());

        // dt 0.25 at speed 2 is half the run per tick.
        assert_eq!(tween.advance(0.25), TaskStatus::Running);
        assert!((last.get() - 0.5).abs() < 1e-5);
        assert_eq!(tween.advance(0.25), TaskStatus::Done);
        assert_eq!(last.get(), 1.0);
    }

    #[test]
    fn test_overshoot_curve_writes_beyond_target() {
        let peak = Rc::new(Cell::new(f32::MIN));
        let sink = Rc::clone(&peak);
        let mut tween = Tween::over(0.0f32, 10.0, 1.0, move |v| sink.set(sink.get().max(v)))
            .with_curve(Curve::ease_out_back().into_shared());

        while tween.advance(0.05) == TaskStatus::Running {}
        assert!(peak.get() > 10.0);
    }
}
