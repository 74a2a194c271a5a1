//! Clickable elements
//!
//! Click dispatch with an explicit, ordered subscriber list: handlers run in
//! registration order and are invoked unguarded, so a panicking handler
//! propagates to the host. An optional feedback hook (click audio lives
//! there, outside this crate) runs before the handlers.

use smallvec::SmallVec;

use crate::element::UiElement;

type ClickHandler = Box<dyn FnMut()>;

/// A [`UiElement`] users can click.
pub struct InteractableElement {
    element: UiElement,
    click_handlers: SmallVec<[ClickHandler; 2]>,
    click_feedback: Option<Box<dyn FnMut()>>,
}

impl InteractableElement {
    pub fn new(element: UiElement) -> Self {
        Self {
            element,
            click_handlers: SmallVec::new(),
            click_feedback: None,
        }
    }

    pub fn element(&self) -> &UiElement {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut UiElement {
        &mut self.element
    }

    /// Registers a click handler. Handlers fire in registration order.
    pub fn on_click(&mut self, handler: impl FnMut() + 'static) {
        self.click_handlers.push(Box::new(handler));
    }

    /// Drops every registered click handler.
    pub fn clear_click_handlers(&mut self) {
        self.click_handlers.clear();
    }

    /// Installs the side-effect hook invoked before the handlers.
    pub fn set_click_feedback(&mut self, feedback: impl FnMut() + 'static) {
        self.click_feedback = Some(Box::new(feedback));
    }

    /// Delivers a click. Swallowed while any block context suppresses input.
    pub fn click(&mut self) {
        if !self.element.interactable() {
            return;
        }
        if let Some(feedback) = self.click_feedback.as_mut() {
            feedback();
        }
        for handler in self.click_handlers.iter_mut() {
            handler();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::Visual;
    use easel_animation::Scheduler;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn clickable(name: &str) -> InteractableElement {
        let scheduler = Scheduler::new();
        let visual = Visual::shared();
        InteractableElement::new(UiElement::new(name, scheduler, visual))
    }

    #[test]
    fn test_handlers_fire_in_registration_order() {
        let mut button = clickable("ok");
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        button.on_click(move || first.borrow_mut().push("first"));
        let second = Rc::clone(&log);
        button.on_click(move || second.borrow_mut().push("second"));
        let feedback = Rc::clone(&log);
        button.set_click_feedback(move || feedback.borrow_mut().push("feedback"));

        button.click();
        assert_eq!(*log.borrow(), vec!["feedback", "first", "second"]);
    }

    #[test]
    fn test_blocked_element_swallows_clicks() {
        let mut button = clickable("ok");
        let count = Rc::new(RefCell::new(0u32));

        let clicks = Rc::clone(&count);
        button.on_click(move || *clicks.borrow_mut() += 1);

        button.element_mut().raycast_block("Cutscene", true);
        button.click();
        assert_eq!(*count.borrow(), 0);

        button.element_mut().raycast_block("Cutscene", false);
        button.click();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_cleared_handlers_never_fire() {
        let mut button = clickable("ok");
        let count = Rc::new(RefCell::new(0u32));

        let clicks = Rc::clone(&count);
        button.on_click(move || *clicks.borrow_mut() += 1);
        button.clear_click_handlers();

        button.click();
        assert_eq!(*count.borrow(), 0);
    }
}
