//! Task slots
//!
//! A slot is the exclusive ownership channel for one animatable property:
//! at most one live task ever writes through it. Starting a new task in an
//! occupied slot cancels the incumbent first, so two animations never fight
//! over the same sink.

use std::cell::Cell;
use std::rc::Rc;

use crate::interpolate::Animatable;
use crate::scheduler::{Scheduler, TaskId, TickLane};
use crate::task::Tween;

/// Restart controller for one logical animation channel.
///
/// Clones share the same underlying slot, which lets a completion callback
/// chain a follow-up animation into the channel it just finished in.
#[derive(Clone, Default)]
pub struct TaskSlot {
    current: Rc<Cell<Option<TaskId>>>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels whatever the slot holds, then installs `tween` on the frame
    /// lane. Returns the new task's handle, or `None` if it completed
    /// synchronously.
    pub fn restart<T: Animatable>(&self, scheduler: &Scheduler, tween: Tween<T>) -> Option<TaskId> {
        self.restart_on(scheduler, TickLane::Frame, tween)
    }

    pub fn restart_on<T: Animatable>(
        &self,
        scheduler: &Scheduler,
        lane: TickLane,
        tween: Tween<T>,
    ) -> Option<TaskId> {
        self.stop(scheduler);
        let id = scheduler.spawn_on(lane, tween);
        if id.is_some() {
            // A synchronously completed tween may already have chained a
            // replacement into this slot; only a registered task claims it.
            self.current.set(id);
        }
        id
    }

    /// Cancels and clears without installing a replacement. The sink keeps
    /// the value of the last completed tick.
    pub fn stop(&self, scheduler: &Scheduler) {
        if let Some(id) = self.current.take() {
            scheduler.cancel(id);
        }
    }

    /// True while the slot's task is still registered with the scheduler.
    pub fn is_running(&self, scheduler: &Scheduler) -> bool {
        match self.current.get() {
            Some(id) => scheduler.contains(id),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_restart_cancels_incumbent() {
        let scheduler = Scheduler::new();
        let slot = TaskSlot::new();

        let first_writes = Rc::new(RefCell::new(Vec::new()));
        let first_done = Rc::new(Cell::new(false));
        let sink = Rc::clone(&first_writes);
        let done = Rc::clone(&first_done);
        slot.restart(
            &scheduler,
            Tween::over(0.0f32, 1.0, 1.0, move |v| sink.borrow_mut().push(v))
                .on_complete(move || done.set(true)),
        );
        scheduler.tick(0.25);
        let first_count = first_writes.borrow().len();
        assert_eq!(first_count, 1);

        let second_writes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&second_writes);
        slot.restart(
            &scheduler,
            Tween::over(100.0f32, 200.0, 1.0, move |v| sink.borrow_mut().push(v)),
        );

        for _ in 0..4 {
            scheduler.tick(0.25);
        }

        // The first task never wrote again and its completion never fired.
        assert_eq!(first_writes.borrow().len(), first_count);
        assert!(!first_done.get());
        // The second ran to its exact target.
        assert_eq!(*second_writes.borrow().last().unwrap(), 200.0);
    }

    #[test]
    fn test_stop_clears_without_completion() {
        let scheduler = Scheduler::new();
        let slot = TaskSlot::new();
        let done = Rc::new(Cell::new(false));

        let flag = Rc::clone(&done);
        slot.restart(
            &scheduler,
            Tween::over(0.0f32, 1.0, 1.0, |_| ()).on_complete(move || flag.set(true)),
        );
        assert!(slot.is_running(&scheduler));

        slot.stop(&scheduler);
        assert!(!slot.is_running(&scheduler));
        assert_eq!(scheduler.task_count(), 0);

        scheduler.tick(1.0);
        assert!(!done.get());
    }

    #[test]
    fn test_slot_clears_after_natural_completion() {
        let scheduler = Scheduler::new();
        let slot = TaskSlot::new();

        slot.restart(&scheduler, Tween::over(0.0f32, 1.0, 0.2, |_| ()));
        assert!(slot.is_running(&scheduler));

        scheduler.tick(0.25);
        assert!(!slot.is_running(&scheduler));
        // Stopping a retired task is a no-op.
        slot.stop(&scheduler);
    }

    #[test]
    fn test_completion_chains_into_same_slot() {
        let scheduler = Scheduler::new();
        let slot = TaskSlot::new();
        let phase_two_writes = Rc::new(Cell::new(0u32));

        let chain_slot = slot.clone();
        let chain_scheduler = scheduler.clone();
        let writes = Rc::clone(&phase_two_writes);
        slot.restart(
            &scheduler,
            Tween::over(0.0f32, 1.0, 0.1, |_| ()).on_complete(move || {
                let writes = Rc::clone(&writes);
                chain_slot.restart(
                    &chain_scheduler,
                    Tween::over(1.0f32, 0.0, 10.0, move |_| writes.set(writes.get() + 1)),
                );
            }),
        );

        // First phase completes; the chained phase is installed but not
        // advanced until the next tick.
        scheduler.tick(0.2);
        assert!(slot.is_running(&scheduler));
        assert_eq!(phase_two_writes.get(), 0);

        scheduler.tick(0.2);
        assert_eq!(phase_two_writes.get(), 1);
    }
}
