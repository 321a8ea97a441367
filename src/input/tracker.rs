//! Mouse and touch normalization.
//!
//! Mouse buttons and single-finger touch all end up as the same
//! press/drag/release actions. Only one stroke identity exists at a time; a
//! second finger never starts or steers a stroke.

use super::events::{MouseButton, TouchPoint};
use crate::draw::Point;
use log::trace;

/// Normalized pointer action for the session to act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// A stroke starts at `at`. `force_eraser` is set for the secondary button.
    Press { at: Point, force_eraser: bool },
    /// The active stroke moves to the point.
    Drag(Point),
    /// The active stroke ends. `forced_eraser` echoes the matching press.
    Release { forced_eraser: bool },
}

/// Where the cursor preview should be drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorPreview {
    pub position: Option<Point>,
    /// False while the pointer is outside the surface bounds.
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressSource {
    Mouse { forced_eraser: bool },
    Touch,
}

/// Turns raw mouse/touch events into [`PointerAction`]s.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    press: Option<PressSource>,
    touch_id: Option<u64>,
    touch_enabled: bool,
    cursor: CursorPreview,
    bounds: (f64, f64),
}

impl PointerTracker {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            press: None,
            touch_id: None,
            touch_enabled: true,
            cursor: CursorPreview::default(),
            bounds: (width, height),
        }
    }

    pub fn set_touch_enabled(&mut self, enabled: bool) {
        self.touch_enabled = enabled;
        if !enabled {
            self.touch_id = None;
        }
    }

    /// Updates the area used for cursor visibility.
    pub fn set_bounds(&mut self, width: f64, height: f64) {
        self.bounds = (width, height);
    }

    pub fn cursor(&self) -> CursorPreview {
        self.cursor
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    pub fn touch_id(&self) -> Option<u64> {
        self.touch_id
    }

    pub fn on_mouse_press(&mut self, button: MouseButton, x: f64, y: f64) -> Option<PointerAction> {
        let force_eraser = match button {
            MouseButton::Left => false,
            MouseButton::Right => true,
            MouseButton::Middle => return None,
        };

        self.press = Some(PressSource::Mouse {
            forced_eraser: force_eraser,
        });
        Some(PointerAction::Press {
            at: Point::new(x, y),
            force_eraser,
        })
    }

    /// Hover always moves the cursor preview; only a held press drags.
    pub fn on_mouse_motion(&mut self, x: f64, y: f64) -> Option<PointerAction> {
        self.update_cursor(x, y);
        self.press.map(|_| PointerAction::Drag(Point::new(x, y)))
    }

    pub fn on_mouse_release(&mut self, _button: MouseButton) -> Option<PointerAction> {
        self.release_mouse()
    }

    /// Leaving the surface ends a mouse stroke, like a release.
    pub fn on_pointer_leave(&mut self) -> Option<PointerAction> {
        self.cursor.visible = false;
        self.release_mouse()
    }

    /// `touches` is every contact currently on the surface.
    pub fn on_touch_start(&mut self, touches: &[TouchPoint]) -> Option<PointerAction> {
        if !self.touch_enabled {
            return None;
        }

        let [touch] = touches else {
            trace!("Ignoring touch start with {} contacts", touches.len());
            return None;
        };

        self.touch_id = Some(touch.id);
        self.press = Some(PressSource::Touch);
        self.update_cursor(touch.x, touch.y);
        Some(PointerAction::Press {
            at: Point::new(touch.x, touch.y),
            force_eraser: false,
        })
    }

    pub fn on_touch_move(&mut self, touches: &[TouchPoint]) -> Option<PointerAction> {
        let tracked = self.tracked_touch(touches)?;
        self.update_cursor(tracked.x, tracked.y);

        match self.press {
            Some(PressSource::Touch) => Some(PointerAction::Drag(Point::new(tracked.x, tracked.y))),
            _ => None,
        }
    }

    /// `changed` is the set of contacts that lifted or were cancelled.
    pub fn on_touch_end(&mut self, changed: &[TouchPoint]) -> Option<PointerAction> {
        self.tracked_touch(changed)?;
        self.touch_id = None;

        if self.press == Some(PressSource::Touch) {
            self.press = None;
        }
        Some(PointerAction::Release {
            forced_eraser: false,
        })
    }

    fn tracked_touch(&self, touches: &[TouchPoint]) -> Option<TouchPoint> {
        let id = self.touch_id?;
        touches.iter().find(|t| t.id == id).copied()
    }

    fn release_mouse(&mut self) -> Option<PointerAction> {
        match self.press {
            Some(PressSource::Mouse { forced_eraser }) => {
                self.press = None;
                Some(PointerAction::Release { forced_eraser })
            }
            _ => None,
        }
    }

    fn update_cursor(&mut self, x: f64, y: f64) {
        let (width, height) = self.bounds;
        self.cursor = CursorPreview {
            position: Some(Point::new(x, y)),
            visible: (0.0..=width).contains(&x) && (0.0..=height).contains(&y),
        };
    }
}
