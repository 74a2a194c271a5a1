//! Easel UI Element Lifecycle
//!
//! Animated enable/disable state machines built on `easel_animation`:
//!
//! - **Elements**: alpha-fade enable/disable with logical state decoupled
//!   from the in-flight animation
//! - **Input Blocking**: named block contexts, interactable only while the
//!   set is empty
//! - **Click Dispatch**: ordered subscriber lists with an external feedback
//!   seam
//! - **Windows**: open/close controllers over a container element

pub mod element;
pub mod interactable;
pub mod visual;
pub mod window;

pub use element::{LifecyclePhase, UiElement, DISABLED_CONTEXT};
pub use interactable::InteractableElement;
pub use visual::Visual;
pub use window::WindowController;
