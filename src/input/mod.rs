//! Input handling: host-independent events and the pointer tracker.

pub mod events;
pub mod tracker;

pub use events::{Key, Modifiers, MouseButton, TouchPoint};
pub use tracker::{CursorPreview, PointerAction, PointerTracker};
