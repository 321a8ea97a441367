use std::fmt;
use std::path::Path;

type SaveCallback = Box<dyn FnMut(&Path)>;
type ClearCallback = Box<dyn FnMut()>;
type EraserCallback = Box<dyn FnMut(bool)>;

/// Optional host hooks fired after board actions.
///
/// Every hook is optional; a board without any still works, the host just
/// gets no feedback beyond notices.
#[derive(Default)]
pub struct Capabilities {
    pub(super) on_save: Option<SaveCallback>,
    pub(super) on_clear: Option<ClearCallback>,
    pub(super) on_eraser_toggle: Option<EraserCallback>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the written path after a successful save.
    pub fn on_save(mut self, callback: impl FnMut(&Path) + 'static) -> Self {
        self.on_save = Some(Box::new(callback));
        self
    }

    pub fn on_clear(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_clear = Some(Box::new(callback));
        self
    }

    /// Called with the new state whenever the eraser toggle changes.
    pub fn on_eraser_toggle(mut self, callback: impl FnMut(bool) + 'static) -> Self {
        self.on_eraser_toggle = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("on_save", &self.on_save.is_some())
            .field("on_clear", &self.on_clear.is_some())
            .field("on_eraser_toggle", &self.on_eraser_toggle.is_some())
            .finish()
    }
}
