//! UI element lifecycle
//!
//! Animated enable/disable transitions built from tween tasks: alpha fades,
//! reference-counted input blocking by named context, and one task slot per
//! animatable property so re-triggered transitions restart instead of
//! fighting.
//!
//! Logical state and visual state are deliberately decoupled: `is_enabled`
//! flips the moment a transition is requested, input is blocked for exactly
//! the disabled window (immediately on `disable`, not when the fade lands),
//! and only the alpha lags behind on the animation.

use std::cell::RefCell;
use std::rc::Rc;

use easel_animation::{
    AnimationError, Color, Curve, Scheduler, StepMode, TaskId, TaskSlot, Tween,
};
use glam::{Quat, Vec3};
use rustc_hash::FxHashSet;

use crate::visual::Visual;

/// The block context owned by the enable/disable lifecycle itself.
pub const DISABLED_CONTEXT: &str = "Disabled";

const DEFAULT_ENABLE_ANIMATION_TIME: f32 = 0.5;

/// Where an initialized element is within its enable/disable lifecycle.
///
/// `is_enabled` reflects the requested logical state; the phase tracks the
/// animation realizing it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LifecyclePhase {
    #[default]
    Disabled,
    Enabling,
    Enabled,
    Disabling,
}

struct ElementState {
    initialized: bool,
    is_enabled: bool,
    was_enabled: bool,
    phase: LifecyclePhase,
    block_contexts: FxHashSet<String>,
}

impl ElementState {
    fn new() -> Self {
        Self {
            initialized: false,
            is_enabled: false,
            was_enabled: false,
            phase: LifecyclePhase::Disabled,
            block_contexts: FxHashSet::default(),
        }
    }
}

/// A UI element with animated enable/disable transitions.
///
/// Constructed by the composition root with an explicit [`Scheduler`] handle
/// and the host-owned [`Visual`] it animates. Each animatable property has
/// its own dedicated slot, so there is never more than one writer per
/// property.
pub struct UiElement {
    name: String,
    scheduler: Scheduler,
    visual: Rc<RefCell<Visual>>,
    state: Rc<RefCell<ElementState>>,
    enable_animation_time: f32,

    enable_slot: TaskSlot,
    disable_slot: TaskSlot,
    movement_slot: TaskSlot,
    rotation_slot: TaskSlot,
    scaling_slot: TaskSlot,
    alpha_slot: TaskSlot,
    color_slot: TaskSlot,
}

impl UiElement {
    pub fn new(name: impl Into<String>, scheduler: Scheduler, visual: Rc<RefCell<Visual>>) -> Self {
        Self {
            name: name.into(),
            scheduler,
            visual,
            state: Rc::new(RefCell::new(ElementState::new())),
            enable_animation_time: DEFAULT_ENABLE_ANIMATION_TIME,
            enable_slot: TaskSlot::new(),
            disable_slot: TaskSlot::new(),
            movement_slot: TaskSlot::new(),
            rotation_slot: TaskSlot::new(),
            scaling_slot: TaskSlot::new(),
            alpha_slot: TaskSlot::new(),
            color_slot: TaskSlot::new(),
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// One-time initialization. Every entry point calls it lazily; calling
    /// it again before [`UiElement::deinit_and_refresh`] is rejected with a
    /// warning and leaves state untouched.
    pub fn init(&mut self) {
        let already = self.state.borrow().initialized;
        if already {
            tracing::warn!(element = %self.name, "already initialized, call rejected");
            return;
        }
        self.init_internal(false);
    }

    fn init_internal(&mut self, called_by_enable: bool) {
        {
            let mut state = self.state.borrow_mut();
            if state.initialized {
                return;
            }
            state.initialized = true;
        }

        // An element placed in the scene already visible counts as enabled
        // from the start.
        let auto_enable = !called_by_enable && !self.state.borrow().was_enabled && {
            let visual = self.visual.borrow();
            visual.alpha > 0.99 && visual.active
        };
        if auto_enable {
            self.enable_impl(None);
        }
    }

    fn ensure_initialized(&mut self) {
        if !self.state.borrow().initialized {
            self.init_internal(false);
        }
    }

    /// Returns the element to its first-load state for reuse across a scene
    /// transition: every animation channel stops, block contexts clear, the
    /// logical enabled flag is re-derived from current visibility, and the
    /// element must be re-initialized before further use.
    pub fn deinit_and_refresh(&mut self) {
        if !self.state.borrow().initialized {
            return;
        }
        self.stop_all_slots();

        let active = self.visual.borrow().active;
        let mut state = self.state.borrow_mut();
        state.is_enabled = active;
        state.was_enabled = false;
        state.initialized = false;
        state.phase = if active {
            LifecyclePhase::Enabled
        } else {
            LifecyclePhase::Disabled
        };
        state.block_contexts.clear();
        drop(state);
        self.visual.borrow_mut().accepts_input = true;
    }

    fn stop_all_slots(&self) {
        for slot in [
            &self.enable_slot,
            &self.disable_slot,
            &self.movement_slot,
            &self.rotation_slot,
            &self.scaling_slot,
            &self.alpha_slot,
            &self.color_slot,
        ] {
            slot.stop(&self.scheduler);
        }
    }

    // =========================================================================
    // Enable / Disable
    // =========================================================================

    /// Enables the element with an alpha fade to fully opaque.
    ///
    /// Cancels any in-flight disable, activates visibility, clears the
    /// lifecycle block context, and flips `is_enabled` immediately; only the
    /// fade is asynchronous.
    pub fn enable(&mut self) -> Option<TaskId> {
        self.enable_impl(None)
    }

    /// [`UiElement::enable`] with a completion callback. The callback fires
    /// when the fade lands (synchronously for a zero-time fade) and never
    /// fires if the transition is superseded.
    pub fn enable_with(&mut self, on_done: impl FnOnce() + 'static) -> Option<TaskId> {
        self.enable_impl(Some(Box::new(on_done)))
    }

    fn enable_impl(&mut self, on_done: Option<Box<dyn FnOnce()>>) -> Option<TaskId> {
        if !self.state.borrow().initialized {
            self.init_internal(true);
        }

        {
            let mut state = self.state.borrow_mut();
            if !state.was_enabled {
                state.was_enabled = true;
                // First enable of an authored-opaque element: restart the
                // fade from fully transparent so it is actually visible.
                let mut visual = self.visual.borrow_mut();
                if visual.alpha > 0.99 {
                    visual.alpha = 0.0;
                }
            }
        }

        self.disable_slot.stop(&self.scheduler);
        self.visual.borrow_mut().active = true;
        raycast_block_impl(
            &self.name,
            &self.state,
            &self.visual,
            DISABLED_CONTEXT,
            false,
            true,
        );
        {
            let mut state = self.state.borrow_mut();
            state.is_enabled = true;
            state.phase = LifecyclePhase::Enabling;
        }

        let start_alpha = self.visual.borrow().alpha;
        let sink = Rc::clone(&self.visual);
        let name = self.name.clone();
        let done_state = Rc::clone(&self.state);
        let done_visual = Rc::clone(&self.visual);
        let tween = Tween::over(start_alpha, 1.0, self.enable_animation_time, move |alpha| {
            sink.borrow_mut().alpha = alpha
        })
        .on_complete(move || {
            raycast_block_impl(&name, &done_state, &done_visual, DISABLED_CONTEXT, false, true);
            done_state.borrow_mut().phase = LifecyclePhase::Enabled;
            if let Some(on_done) = on_done {
                on_done();
            }
        });
        self.enable_slot.restart(&self.scheduler, tween)
    }

    /// Disables the element with an alpha fade to fully transparent.
    ///
    /// No-op returning `None` while the element is not visible. Input dies
    /// the moment this is called, before the fade completes; visibility is
    /// deactivated after it.
    pub fn disable(&mut self) -> Option<TaskId> {
        self.disable_impl(None)
    }

    /// [`UiElement::disable`] with a completion callback, under the same
    /// contract as [`UiElement::enable_with`].
    pub fn disable_with(&mut self, on_done: impl FnOnce() + 'static) -> Option<TaskId> {
        self.disable_impl(Some(Box::new(on_done)))
    }

    fn disable_impl(&mut self, on_done: Option<Box<dyn FnOnce()>>) -> Option<TaskId> {
        if !self.visual.borrow().active {
            return None;
        }
        self.ensure_initialized();
        self.enable_slot.stop(&self.scheduler);
        raycast_block_impl(
            &self.name,
            &self.state,
            &self.visual,
            DISABLED_CONTEXT,
            true,
            true,
        );
        {
            let mut state = self.state.borrow_mut();
            state.is_enabled = false;
            state.phase = LifecyclePhase::Disabling;
        }

        let start_alpha = self.visual.borrow().alpha;
        let sink = Rc::clone(&self.visual);
        let name = self.name.clone();
        let done_state = Rc::clone(&self.state);
        let done_visual = Rc::clone(&self.visual);
        let tween = Tween::over(start_alpha, 0.0, self.enable_animation_time, move |alpha| {
            sink.borrow_mut().alpha = alpha
        })
        .on_complete(move || {
            raycast_block_impl(&name, &done_state, &done_visual, DISABLED_CONTEXT, true, true);
            done_state.borrow_mut().phase = LifecyclePhase::Disabled;
            if let Some(on_done) = on_done {
                on_done();
            }
            done_visual.borrow_mut().active = false;
        });
        self.disable_slot.restart(&self.scheduler, tween)
    }

    /// Synchronous enable: cancels both transition channels, snaps alpha to
    /// 1, and settles all flags before returning.
    pub fn force_enable(&mut self) {
        self.force_enable_impl(None);
    }

    pub fn force_enable_with(&mut self, on_done: impl FnOnce() + 'static) {
        self.force_enable_impl(Some(Box::new(on_done)));
    }

    fn force_enable_impl(&mut self, on_done: Option<Box<dyn FnOnce()>>) {
        self.ensure_initialized();
        self.state.borrow_mut().was_enabled = true;
        self.disable_slot.stop(&self.scheduler);
        self.enable_slot.stop(&self.scheduler);
        self.visual.borrow_mut().active = true;
        raycast_block_impl(
            &self.name,
            &self.state,
            &self.visual,
            DISABLED_CONTEXT,
            false,
            true,
        );
        {
            let mut state = self.state.borrow_mut();
            state.is_enabled = true;
            state.phase = LifecyclePhase::Enabled;
        }
        self.visual.borrow_mut().alpha = 1.0;
        if let Some(on_done) = on_done {
            on_done();
        }
    }

    /// Synchronous disable, mirror of [`UiElement::force_enable`].
    pub fn force_disable(&mut self) {
        self.force_disable_impl(None);
    }

    pub fn force_disable_with(&mut self, on_done: impl FnOnce() + 'static) {
        self.force_disable_impl(Some(Box::new(on_done)));
    }

    fn force_disable_impl(&mut self, on_done: Option<Box<dyn FnOnce()>>) {
        self.ensure_initialized();
        self.disable_slot.stop(&self.scheduler);
        self.enable_slot.stop(&self.scheduler);
        raycast_block_impl(
            &self.name,
            &self.state,
            &self.visual,
            DISABLED_CONTEXT,
            true,
            true,
        );
        {
            let mut state = self.state.borrow_mut();
            state.is_enabled = false;
            state.phase = LifecyclePhase::Disabled;
        }
        self.visual.borrow_mut().alpha = 0.0;
        if let Some(on_done) = on_done {
            on_done();
        }
        self.visual.borrow_mut().active = false;
    }

    // =========================================================================
    // Input blocking
    // =========================================================================

    /// Adds or removes a named input-block context. Input is suppressed
    /// while any context is present. A redundant add or an absent remove is
    /// reported and otherwise ignored; the set stays correct either way.
    pub fn raycast_block(&mut self, context: &str, block: bool) {
        self.ensure_initialized();
        raycast_block_impl(&self.name, &self.state, &self.visual, context, block, false);
    }

    /// True while no block context suppresses input.
    pub fn interactable(&self) -> bool {
        self.state.borrow().block_contexts.is_empty()
    }

    pub fn is_input_blocked(&self) -> bool {
        !self.interactable()
    }

    pub fn has_block_context(&self, context: &str) -> bool {
        self.state.borrow().block_contexts.contains(context)
    }

    pub fn block_context_count(&self) -> usize {
        self.state.borrow().block_contexts.len()
    }

    // =========================================================================
    // Property animations
    // =========================================================================

    /// Animates the position toward `target` through the movement channel;
    /// a previous movement task, if any, is cancelled first.
    pub fn move_to(
        &mut self,
        target: Vec3,
        mode: StepMode,
        curve: Option<Rc<Curve>>,
    ) -> Result<Option<TaskId>, AnimationError> {
        let start = self.visual.borrow().position;
        let sink = Rc::clone(&self.visual);
        self.animate_channel(&self.movement_slot, start, target, mode, curve, move |p| {
            sink.borrow_mut().position = p
        })
    }

    /// Animates the rotation toward `target` through the rotation channel.
    pub fn rotate_to(
        &mut self,
        target: Quat,
        mode: StepMode,
        curve: Option<Rc<Curve>>,
    ) -> Result<Option<TaskId>, AnimationError> {
        let start = self.visual.borrow().rotation;
        let sink = Rc::clone(&self.visual);
        self.animate_channel(&self.rotation_slot, start, target, mode, curve, move |r| {
            sink.borrow_mut().rotation = r
        })
    }

    /// Animates the scale toward `target` through the scaling channel.
    pub fn scale_to(
        &mut self,
        target: Vec3,
        mode: StepMode,
        curve: Option<Rc<Curve>>,
    ) -> Result<Option<TaskId>, AnimationError> {
        let start = self.visual.borrow().scale;
        let sink = Rc::clone(&self.visual);
        self.animate_channel(&self.scaling_slot, start, target, mode, curve, move |s| {
            sink.borrow_mut().scale = s
        })
    }

    /// Animates the alpha toward `target` through its own channel,
    /// independent of the enable/disable fade.
    pub fn change_alpha(
        &mut self,
        target: f32,
        mode: StepMode,
        curve: Option<Rc<Curve>>,
    ) -> Result<Option<TaskId>, AnimationError> {
        let start = self.visual.borrow().alpha;
        let sink = Rc::clone(&self.visual);
        self.animate_channel(&self.alpha_slot, start, target, mode, curve, move |a| {
            sink.borrow_mut().alpha = a
        })
    }

    /// Animates the tint toward `target` through the color channel.
    pub fn recolor(
        &mut self,
        target: Color,
        mode: StepMode,
        curve: Option<Rc<Curve>>,
    ) -> Result<Option<TaskId>, AnimationError> {
        let start = self.visual.borrow().color;
        let sink = Rc::clone(&self.visual);
        self.animate_channel(&self.color_slot, start, target, mode, curve, move |c| {
            sink.borrow_mut().color = c
        })
    }

    fn animate_channel<T: easel_animation::Animatable>(
        &self,
        slot: &TaskSlot,
        start: T,
        target: T,
        mode: StepMode,
        curve: Option<Rc<Curve>>,
        sink: impl FnMut(T) + 'static,
    ) -> Result<Option<TaskId>, AnimationError> {
        let mut tween = Tween::new(start, target, mode, sink)?;
        if let Some(curve) = curve {
            tween = tween.with_curve(curve);
        }
        Ok(slot.restart(&self.scheduler, tween))
    }

    /// Snaps alpha without animating. Does not disturb a running alpha task;
    /// use the slots if exclusivity matters.
    pub fn set_alpha_immediately(&mut self, alpha: f32) {
        self.ensure_initialized();
        self.visual.borrow_mut().alpha = alpha;
    }

    // =========================================================================
    // Sequenced helpers
    // =========================================================================

    /// Scales up to `max_scale`, holds for `hold_secs`, then eases back to
    /// the starting scale. Runs in the scaling channel; re-triggering
    /// restarts the whole gesture.
    pub fn pulse(&mut self, max_scale: Vec3, secs: f32, hold_secs: f32) -> Option<TaskId> {
        let origin = self.visual.borrow().scale;
        let visual = Rc::clone(&self.visual);
        let scheduler = self.scheduler.clone();
        let slot = self.scaling_slot.clone();

        let up_sink = Rc::clone(&visual);
        let up = Tween::over(origin, max_scale, secs, move |scale| {
            up_sink.borrow_mut().scale = scale
        })
        .on_complete(move || {
            let return_slot = slot.clone();
            let return_scheduler = scheduler.clone();
            let hold = Tween::over(0.0f32, 1.0, hold_secs, |_| ()).on_complete(move || {
                let start = visual.borrow().scale;
                let down_sink = Rc::clone(&visual);
                let down = Tween::over(start, origin, secs, move |scale| {
                    down_sink.borrow_mut().scale = scale
                });
                return_slot.restart(&return_scheduler, down);
            });
            slot.restart(&scheduler, hold);
        });
        self.scaling_slot.restart(&self.scheduler, up)
    }

    /// Rotates a quarter turn out around `axis` and back, through the
    /// rotation channel.
    pub fn flip(&mut self, axis: Vec3, secs: f32) -> Option<TaskId> {
        let out = Quat::from_scaled_axis(axis.normalize_or_zero() * std::f32::consts::FRAC_PI_2);
        let start = self.visual.borrow().rotation;
        let visual = Rc::clone(&self.visual);
        let scheduler = self.scheduler.clone();
        let slot = self.rotation_slot.clone();

        let out_sink = Rc::clone(&visual);
        let tween = Tween::over(start, out, secs, move |rotation| {
            out_sink.borrow_mut().rotation = rotation
        })
        .on_complete(move || {
            let from = visual.borrow().rotation;
            let back_sink = Rc::clone(&visual);
            let back = Tween::over(from, Quat::IDENTITY, secs, move |rotation| {
                back_sink.borrow_mut().rotation = rotation
            });
            slot.restart(&scheduler, back);
        });
        self.rotation_slot.restart(&self.scheduler, tween)
    }

    /// Tints to `color`, holds for `hold_secs`, then returns to the starting
    /// tint. Runs in the color channel.
    pub fn blink(&mut self, color: Color, secs: f32, hold_secs: f32) -> Option<TaskId> {
        let origin = self.visual.borrow().color;
        let visual = Rc::clone(&self.visual);
        let scheduler = self.scheduler.clone();
        let slot = self.color_slot.clone();

        let there_sink = Rc::clone(&visual);
        let there = Tween::over(origin, color, secs, move |c| {
            there_sink.borrow_mut().color = c
        })
        .on_complete(move || {
            let return_slot = slot.clone();
            let return_scheduler = scheduler.clone();
            let hold = Tween::over(0.0f32, 1.0, hold_secs, |_| ()).on_complete(move || {
                let from = visual.borrow().color;
                let back_sink = Rc::clone(&visual);
                let back = Tween::over(from, origin, secs, move |c| {
                    back_sink.borrow_mut().color = c
                });
                return_slot.restart(&return_scheduler, back);
            });
            slot.restart(&scheduler, hold);
        });
        self.color_slot.restart(&self.scheduler, there)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requested logical state, independent of any in-flight fade.
    pub fn is_enabled(&self) -> bool {
        self.state.borrow().is_enabled
    }

    pub fn was_enabled(&self) -> bool {
        self.state.borrow().was_enabled
    }

    pub fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.state.borrow().phase
    }

    pub fn enable_animation_time(&self) -> f32 {
        self.enable_animation_time
    }

    pub fn set_enable_animation_time(&mut self, secs: f32) {
        self.enable_animation_time = secs;
    }

    /// The shared visual this element animates; the host reads it when
    /// presenting.
    pub fn visual(&self) -> &Rc<RefCell<Visual>> {
        &self.visual
    }
}

fn raycast_block_impl(
    name: &str,
    state: &Rc<RefCell<ElementState>>,
    visual: &Rc<RefCell<Visual>>,
    context: &str,
    block: bool,
    suppress_warnings: bool,
) {
    let mut state = state.borrow_mut();
    if block {
        if !state.block_contexts.insert(context.to_string()) && !suppress_warnings {
            tracing::warn!(element = %name, context, "block context already present");
        }
    } else if !state.block_contexts.remove(context) && !suppress_warnings {
        tracing::warn!(element = %name, context, "no such block context to remove");
    }
    visual.borrow_mut().accepts_input = state.block_contexts.is_empty();
}
