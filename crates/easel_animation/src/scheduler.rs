//! The tick scheduler
//!
//! Single-threaded and cooperative: the host calls [`Scheduler::tick`] once
//! per rendered frame (and [`Scheduler::fixed_tick`] once per fixed
//! simulation step), and every live task on that lane advances exactly once,
//! in registration order. Nothing runs in parallel; all suspension happens
//! at tick boundaries, so a task's sink never races another task's sink.
//!
//! The scheduler is handed around by cloning the handle. It is constructed
//! once at the composition root and passed explicitly to every consumer;
//! there is no global registry.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use crate::interpolate::Animatable;
use crate::task::{Animate, TaskStatus, Tween};

new_key_type! {
    /// Handle to a registered animation task.
    pub struct TaskId;
}

/// Which host notification drives a task.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TickLane {
    /// Advanced by [`Scheduler::tick`], once per rendered frame.
    #[default]
    Frame,
    /// Advanced by [`Scheduler::fixed_tick`], once per fixed simulation step.
    Fixed,
}

struct TaskEntry {
    /// Taken out while the task is being advanced, so its callbacks can
    /// re-enter the scheduler.
    task: Option<Box<dyn Animate>>,
    /// Set when a cancel lands while the task is out being advanced.
    cancelled: bool,
}

struct ConditionalAction {
    predicate: Box<dyn Fn() -> bool>,
    action: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct SchedulerInner {
    tasks: SlotMap<TaskId, TaskEntry>,
    frame_order: Vec<TaskId>,
    fixed_order: Vec<TaskId>,
    deferred: VecDeque<Box<dyn FnOnce()>>,
    conditional: VecDeque<ConditionalAction>,
}

/// Cheaply clonable handle to a single scheduler instance.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tween on the per-frame lane.
    ///
    /// Tweens with nothing to interpolate (start equals target, or zero
    /// duration) complete synchronously: the sink receives the target and
    /// the completion callback fires before this call returns, and `None`
    /// comes back instead of a handle.
    pub fn spawn<T: Animatable>(&self, tween: Tween<T>) -> Option<TaskId> {
        self.spawn_on(TickLane::Frame, tween)
    }

    /// Registers a tween on the fixed-step lane.
    pub fn spawn_fixed<T: Animatable>(&self, tween: Tween<T>) -> Option<TaskId> {
        self.spawn_on(TickLane::Fixed, tween)
    }

    pub fn spawn_on<T: Animatable>(&self, lane: TickLane, mut tween: Tween<T>) -> Option<TaskId> {
        if tween.finishes_immediately() {
            tween.finish();
            return None;
        }
        let mut inner = self.inner.borrow_mut();
        let id = inner.tasks.insert(TaskEntry {
            task: Some(Box::new(tween)),
            cancelled: false,
        });
        match lane {
            TickLane::Frame => inner.frame_order.push(id),
            TickLane::Fixed => inner.fixed_order.push(id),
        }
        tracing::trace!(task = ?id, ?lane, "task registered");
        Some(id)
    }

    /// Cancels a task: it is unregistered without a final write and without
    /// its completion callback, leaving the sink at whatever value the last
    /// completed tick produced. Unknown or already-retired ids are ignored.
    pub fn cancel(&self, id: TaskId) {
        let mut inner = self.inner.borrow_mut();
        match inner.tasks.get_mut(id) {
            // Mid-advance: flag it; the tick loop drops it on return.
            Some(entry) if entry.task.is_none() => entry.cancelled = true,
            Some(_) => {
                inner.tasks.remove(id);
                tracing::trace!(task = ?id, "task cancelled");
            }
            None => {}
        }
    }

    /// True while the task is registered, including the tick that retires it.
    pub fn contains(&self, id: TaskId) -> bool {
        self.inner.borrow().tasks.contains_key(id)
    }

    pub fn task_count(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    /// Advances every frame-lane task by `dt` seconds, then services the
    /// deferred queues.
    pub fn tick(&self, dt: f32) {
        self.run_lane(TickLane::Frame, dt);
        self.run_deferred();
        self.run_conditional();
    }

    /// Advances every fixed-lane task by `dt` seconds.
    pub fn fixed_tick(&self, dt: f32) {
        self.run_lane(TickLane::Fixed, dt);
    }

    fn run_lane(&self, lane: TickLane, dt: f32) {
        // Snapshot of the order list: tasks registered during this tick
        // first run on the next one, and a task cancelled mid-tick is
        // skipped rather than resumed.
        let order: Vec<TaskId> = {
            let inner = self.inner.borrow();
            match lane {
                TickLane::Frame => inner.frame_order.clone(),
                TickLane::Fixed => inner.fixed_order.clone(),
            }
        };

        for id in order {
            let Some(mut task) = self
                .inner
                .borrow_mut()
                .tasks
                .get_mut(id)
                .and_then(|entry| entry.task.take())
            else {
                continue;
            };

            // No borrow is held here: the sink and the completion callback
            // may spawn, cancel, or restart tasks freely.
            let status = task.advance(dt);

            let mut inner = self.inner.borrow_mut();
            if let Some(entry) = inner.tasks.get_mut(id) {
                if status == TaskStatus::Done || entry.cancelled {
                    inner.tasks.remove(id);
                } else {
                    entry.task = Some(task);
                }
            }
        }

        let mut inner = self.inner.borrow_mut();
        let SchedulerInner {
            tasks,
            frame_order,
            fixed_order,
            ..
        } = &mut *inner;
        match lane {
            TickLane::Frame => frame_order.retain(|id| tasks.contains_key(*id)),
            TickLane::Fixed => fixed_order.retain(|id| tasks.contains_key(*id)),
        }
    }

    /// Queues an action to run on a later frame tick. At most one queued
    /// action runs per tick, in submission order. Actions are invoked
    /// unguarded; a panicking action propagates to the host.
    pub fn defer(&self, action: impl FnOnce() + 'static) {
        self.inner.borrow_mut().deferred.push_back(Box::new(action));
    }

    /// Queues an action to run on the first frame tick where `predicate`
    /// returns true. The head of the queue blocks the entries behind it
    /// until its predicate passes. Same unguarded invocation policy as
    /// [`Scheduler::defer`].
    pub fn defer_until(
        &self,
        predicate: impl Fn() -> bool + 'static,
        action: impl FnOnce() + 'static,
    ) {
        self.inner
            .borrow_mut()
            .conditional
            .push_back(ConditionalAction {
                predicate: Box::new(predicate),
                action: Box::new(action),
            });
    }

    fn run_deferred(&self) {
        let action = self.inner.borrow_mut().deferred.pop_front();
        if let Some(action) = action {
            action();
        }
    }

    fn run_conditional(&self) {
        let Some(head) = self.inner.borrow_mut().conditional.pop_front() else {
            return;
        };
        if (head.predicate)() {
            (head.action)();
        } else {
            self.inner.borrow_mut().conditional.push_front(head);
        }
    }
}
