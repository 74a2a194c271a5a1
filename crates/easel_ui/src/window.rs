//! Window controllers
//!
//! A thin lifecycle wrapper over a container element: open and close map to
//! the element's animated enable and disable, with persistent subscriber
//! lists on top of the per-call callbacks. Subscribers fire in registration
//! order, before the per-call callback.

use std::cell::RefCell;
use std::rc::Rc;

use easel_animation::TaskId;

use crate::element::UiElement;

type Subscribers = Rc<RefCell<Vec<Box<dyn FnMut()>>>>;

pub struct WindowController {
    container: UiElement,
    opened_subscribers: Subscribers,
    closed_subscribers: Subscribers,
}

impl WindowController {
    pub fn new(container: UiElement) -> Self {
        Self {
            container,
            opened_subscribers: Rc::new(RefCell::new(Vec::new())),
            closed_subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Open follows the container's logical enabled flag, not the fade.
    pub fn is_open(&self) -> bool {
        self.container.is_enabled()
    }

    pub fn container(&self) -> &UiElement {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut UiElement {
        &mut self.container
    }

    /// Subscribes to every completed open.
    pub fn on_opened(&mut self, subscriber: impl FnMut() + 'static) {
        self.opened_subscribers
            .borrow_mut()
            .push(Box::new(subscriber));
    }

    /// Subscribes to every completed close.
    pub fn on_closed(&mut self, subscriber: impl FnMut() + 'static) {
        self.closed_subscribers
            .borrow_mut()
            .push(Box::new(subscriber));
    }

    pub fn open(&mut self) -> Option<TaskId> {
        self.open_impl(None)
    }

    pub fn open_with(&mut self, on_open: impl FnOnce() + 'static) -> Option<TaskId> {
        self.open_impl(Some(Box::new(on_open)))
    }

    fn open_impl(&mut self, on_open: Option<Box<dyn FnOnce()>>) -> Option<TaskId> {
        let subscribers = Rc::clone(&self.opened_subscribers);
        self.container.enable_with(move || {
            for subscriber in subscribers.borrow_mut().iter_mut() {
                subscriber();
            }
            if let Some(on_open) = on_open {
                on_open();
            }
        })
    }

    pub fn close(&mut self) -> Option<TaskId> {
        self.close_impl(None)
    }

    pub fn close_with(&mut self, on_close: impl FnOnce() + 'static) -> Option<TaskId> {
        self.close_impl(Some(Box::new(on_close)))
    }

    fn close_impl(&mut self, on_close: Option<Box<dyn FnOnce()>>) -> Option<TaskId> {
        let subscribers = Rc::clone(&self.closed_subscribers);
        self.container.disable_with(move || {
            for subscriber in subscribers.borrow_mut().iter_mut() {
                subscriber();
            }
            if let Some(on_close) = on_close {
                on_close();
            }
        })
    }

    pub fn force_open(&mut self) {
        self.container.force_enable();
    }

    pub fn force_close(&mut self) {
        self.container.force_disable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::Visual;
    use easel_animation::Scheduler;
    use std::cell::Cell;

    fn window(scheduler: &Scheduler) -> WindowController {
        let visual = Visual::shared();
        visual.borrow_mut().active = false;
        visual.borrow_mut().alpha = 0.0;
        let mut container = UiElement::new("window", scheduler.clone(), visual);
        container.set_enable_animation_time(0.2);
        WindowController::new(container)
    }

    #[test]
    fn test_open_close_round_trip() {
        let scheduler = Scheduler::new();
        let mut window = window(&scheduler);
        let opened = Rc::new(Cell::new(0u32));
        let closed = Rc::new(Cell::new(0u32));

        let on_open = Rc::clone(&opened);
        window.on_opened(move || on_open.set(on_open.get() + 1));
        let on_close = Rc::clone(&closed);
        window.on_closed(move || on_close.set(on_close.get() + 1));

        window.open();
        assert!(window.is_open());
        assert_eq!(opened.get(), 0);
        for _ in 0..3 {
            scheduler.tick(0.1);
        }
        assert_eq!(opened.get(), 1);

        window.close();
        assert!(!window.is_open());
        for _ in 0..3 {
            scheduler.tick(0.1);
        }
        assert_eq!(closed.get(), 1);
        assert!(!window.container().visual().borrow().active);
    }

    #[test]
    fn test_per_call_callback_fires_after_subscribers() {
        let scheduler = Scheduler::new();
        let mut window = window(&scheduler);
        let log = Rc::new(RefCell::new(Vec::new()));

        let subscriber = Rc::clone(&log);
        window.on_opened(move || subscriber.borrow_mut().push("subscriber"));
        let once = Rc::clone(&log);
        window.open_with(move || once.borrow_mut().push("per-call"));

        for _ in 0..3 {
            scheduler.tick(0.1);
        }
        assert_eq!(*log.borrow(), vec!["subscriber", "per-call"]);
    }

    #[test]
    fn test_force_variants_are_synchronous() {
        let scheduler = Scheduler::new();
        let mut window = window(&scheduler);

        window.force_open();
        assert!(window.is_open());
        assert_eq!(window.container().visual().borrow().alpha, 1.0);

        window.force_close();
        assert!(!window.is_open());
        assert_eq!(window.container().visual().borrow().alpha, 0.0);
        assert!(!window.container().visual().borrow().active);
    }
}
