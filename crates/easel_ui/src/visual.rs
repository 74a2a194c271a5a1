//! Host-visible visual state
//!
//! The sink record every element animation writes into. The host owns it,
//! hands a shared handle to the element, and reads it back when presenting.

use std::cell::RefCell;
use std::rc::Rc;

use easel_animation::Color;
use glam::{Quat, Vec3};

/// Animatable presentation state of one UI element.
#[derive(Clone, Debug, PartialEq)]
pub struct Visual {
    pub alpha: f32,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub color: Color,
    /// Whether the element participates in layout and rendering at all.
    pub active: bool,
    /// False while any block context suppresses input.
    pub accepts_input: bool,
}

impl Visual {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            color: Color::WHITE,
            active: true,
            accepts_input: true,
        }
    }

    /// The shared-handle form expected by [`UiElement`](crate::UiElement).
    pub fn shared() -> Rc<RefCell<Visual>> {
        Rc::new(RefCell::new(Self::new()))
    }
}

impl Default for Visual {
    fn default() -> Self {
        Self::new()
    }
}
