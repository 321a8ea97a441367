//! The drawing session.
//!
//! [`Chalkboard`] owns everything one board needs: surface, stroke renderer,
//! frame scheduler, pointer tracker, keyboard map, resize debounce and
//! notices. Hosts feed it input events and call [`Chalkboard::on_frame`]
//! whenever their [`FrameHost`] delivers a requested frame.

mod capabilities;

#[cfg(test)]
mod tests;

pub use capabilities::Capabilities;

use crate::config::{Action, Config, KeyBinding, lookup_action};
use crate::debounce::ResizeDebounce;
use crate::draw::{
    Background, ChalkStyle, ColorError, HexColor, Point, StrokeMode, StrokeRenderer, StrokeState,
    Surface, SurfaceError,
};
use crate::export::{self, ExportConfig, ExportError};
use crate::input::{CursorPreview, Key, Modifiers, MouseButton, PointerAction, PointerTracker, TouchPoint};
use crate::notice::{NoticeBoard, NoticeKind};
use crate::scheduler::{FrameHost, FrameOutcome, FrameScheduler};
use log::{debug, error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors raised while setting up a board.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error("invalid keybindings: {0}")]
    Keybindings(String),
}

#[derive(Debug, Clone, Copy)]
struct NoticeTimings {
    help_toggle: Duration,
    notification: Duration,
}

/// One chalkboard session driven by a host event loop.
pub struct Chalkboard<H: FrameHost> {
    host: H,
    surface: Surface,
    renderer: StrokeRenderer,
    scheduler: FrameScheduler,
    tracker: PointerTracker,
    action_map: HashMap<KeyBinding, Action>,
    resize: ResizeDebounce,
    notices: NoticeBoard,
    timings: NoticeTimings,
    capabilities: Capabilities,
    export: ExportConfig,
    /// Eraser toggle state to restore when a secondary-button gesture ends.
    eraser_before_force: Option<bool>,
    rng: StdRng,
}

impl<H: FrameHost> Chalkboard<H> {
    /// Creates a board with an OS-seeded random source.
    pub fn new(config: &Config, width: i32, height: i32, host: H, now: Instant) -> Result<Self, BoardError> {
        Self::with_rng(config, width, height, host, now, StdRng::from_os_rng())
    }

    /// Creates a board with an explicit random source, for reproducible grain.
    pub fn with_rng(
        config: &Config,
        width: i32,
        height: i32,
        host: H,
        now: Instant,
        mut rng: StdRng,
    ) -> Result<Self, BoardError> {
        let background = Background::try_from(&config.canvas)?;
        let mut surface = Surface::new(width, height, background, &mut rng)?;
        surface.set_preserve_on_resize(config.canvas.preserve_on_resize);

        let state = StrokeState {
            color: HexColor::parse(&config.drawing.default_color)?,
            brush_size: config.drawing.brush_size,
            eraser_size: config.drawing.eraser_size,
            ..StrokeState::default()
        };
        let renderer = StrokeRenderer::new(state, ChalkStyle::from(&config.drawing));

        let mut tracker = PointerTracker::new(width as f64, height as f64);
        tracker.set_touch_enabled(config.touch.enabled);

        let action_map = config
            .keybindings
            .build_action_map()
            .map_err(BoardError::Keybindings)?;

        let ui = &config.ui;
        let mut notices = NoticeBoard::new();
        if ui.show_help_on_start {
            notices.post_delayed(
                NoticeKind::Help,
                crate::notice::HELP_TEXT,
                now,
                Duration::from_millis(ui.help_delay_ms),
                Duration::from_millis(ui.help_duration_ms),
            );
        }

        info!("Chalkboard ready at {}x{}", width, height);

        Ok(Self {
            host,
            surface,
            renderer,
            scheduler: FrameScheduler::new().with_soft_limit(config.performance.max_queue_size),
            tracker,
            action_map,
            resize: ResizeDebounce::new(Duration::from_millis(ui.resize_debounce_ms)),
            notices,
            timings: NoticeTimings {
                help_toggle: Duration::from_millis(ui.help_toggle_duration_ms),
                notification: Duration::from_millis(ui.notification_duration_ms),
            },
            capabilities: Capabilities::default(),
            export: ExportConfig::from(&config.save),
            eraser_before_force: None,
            rng,
        })
    }

    /// Installs the host's optional UI callbacks.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn set_export_config(&mut self, export: ExportConfig) {
        self.export = export;
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn stroke(&self) -> &StrokeState {
        self.renderer.state()
    }

    pub fn mode(&self) -> StrokeMode {
        self.renderer.state().mode()
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn cursor(&self) -> CursorPreview {
        self.tracker.cursor()
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    pub fn on_mouse_press(&mut self, button: MouseButton, x: f64, y: f64) {
        let action = self.tracker.on_mouse_press(button, x, y);
        self.apply(action);
    }

    pub fn on_mouse_motion(&mut self, x: f64, y: f64) {
        let action = self.tracker.on_mouse_motion(x, y);
        self.apply(action);
    }

    pub fn on_mouse_release(&mut self, button: MouseButton) {
        let action = self.tracker.on_mouse_release(button);
        self.apply(action);
    }

    pub fn on_pointer_leave(&mut self) {
        let action = self.tracker.on_pointer_leave();
        self.apply(action);
    }

    pub fn on_touch_start(&mut self, touches: &[TouchPoint]) {
        let action = self.tracker.on_touch_start(touches);
        self.apply(action);
    }

    pub fn on_touch_move(&mut self, touches: &[TouchPoint]) {
        let action = self.tracker.on_touch_move(touches);
        self.apply(action);
    }

    pub fn on_touch_end(&mut self, changed: &[TouchPoint]) {
        let action = self.tracker.on_touch_end(changed);
        self.apply(action);
    }

    fn apply(&mut self, action: Option<PointerAction>) {
        match action {
            Some(PointerAction::Press { at, force_eraser }) => {
                if force_eraser {
                    let previous = self.renderer.state().is_erasing;
                    self.eraser_before_force.get_or_insert(previous);
                    self.set_erasing(true);
                } else if let Some(previous) = self.eraser_before_force.take() {
                    // Primary press interrupted a secondary gesture.
                    self.set_erasing(previous);
                }
                self.start_stroke(at);
            }
            Some(PointerAction::Drag(point)) => {
                if self.renderer.state().is_drawing {
                    self.enqueue(point);
                }
            }
            Some(PointerAction::Release { forced_eraser }) => {
                self.stop_stroke();
                if forced_eraser {
                    if let Some(previous) = self.eraser_before_force.take() {
                        self.set_erasing(previous);
                    }
                }
            }
            None => {}
        }
    }

    // ------------------------------------------------------------------
    // Stroke lifecycle
    // ------------------------------------------------------------------

    /// Begins a stroke at `at`, leaving a dot unless erasing.
    pub fn start_stroke(&mut self, at: Point) {
        self.renderer.state_mut().begin(at);

        if !self.renderer.state().is_erasing {
            if let Err(e) = self.renderer.draw_dot(&self.surface, at) {
                warn!("Failed to draw stroke start: {}", e);
            }
        }
    }

    /// Ends the stroke and discards any points not yet rendered.
    pub fn stop_stroke(&mut self) {
        self.renderer.state_mut().end();
        self.scheduler.cancel();
    }

    /// Queues a point for the next frame.
    pub fn enqueue(&mut self, point: Point) {
        self.scheduler.enqueue(point, &mut self.host);
    }

    /// Frame callback: renders everything queued since the last frame.
    pub fn on_frame(&mut self) -> FrameOutcome {
        let surface = &self.surface;
        let renderer = &mut self.renderer;
        let rng = &mut self.rng;

        let outcome = self.scheduler.run_frame(&mut self.host, |point| {
            if let Err(e) = renderer.render(surface, point, rng) {
                warn!("Failed to render point ({:.1}, {:.1}): {}", point.x, point.y, e);
            }
        });

        if let FrameOutcome::Rearmed { rendered } = outcome {
            debug!("Rendered {} queued points", rendered);
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Tools and actions
    // ------------------------------------------------------------------

    /// Flips the eraser toggle.
    pub fn toggle_eraser(&mut self) {
        let erasing = !self.renderer.state().is_erasing;
        self.set_erasing(erasing);
    }

    fn set_erasing(&mut self, erasing: bool) {
        if self.renderer.state().is_erasing == erasing {
            return;
        }
        self.renderer.state_mut().is_erasing = erasing;
        debug!("Eraser {}", if erasing { "on" } else { "off" });

        if let Some(callback) = self.capabilities.on_eraser_toggle.as_mut() {
            callback(erasing);
        }
    }

    /// Changes the chalk color from a `#rrggbb` string.
    pub fn set_color(&mut self, hex: &str) -> Result<(), ColorError> {
        self.renderer.state_mut().color = HexColor::parse(hex)?;
        Ok(())
    }

    /// Wipes all strokes. There is no undo.
    pub fn clear(&mut self) {
        if let Err(e) = self.surface.clear(&mut self.rng) {
            error!("Failed to clear board: {}", e);
            return;
        }
        info!("Board cleared");

        if let Some(callback) = self.capabilities.on_clear.as_mut() {
            callback();
        }
    }

    /// Exports the board as a timestamped PNG.
    ///
    /// Failures are logged and posted as an error notice; the board keeps
    /// working either way.
    pub fn save(&mut self, now: Instant, millis: i64) -> Result<PathBuf, ExportError> {
        let result = export::export_png(&self.surface)
            .and_then(|bytes| export::save_image(&bytes, &self.export, millis));

        match &result {
            Ok(path) => {
                info!("Drawing saved to {}", path.display());
                self.notices.post(
                    NoticeKind::Success,
                    "Drawing saved successfully!",
                    now,
                    self.timings.notification,
                );
                if let Some(callback) = self.capabilities.on_save.as_mut() {
                    callback(path.as_path());
                }
            }
            Err(e) => {
                error!("Failed to save drawing: {}", e);
                self.notices.post(
                    NoticeKind::Error,
                    format!("Could not save drawing: {}", e),
                    now,
                    self.timings.notification,
                );
            }
        }

        result
    }

    /// Shows or hides the controls help.
    pub fn toggle_help(&mut self, now: Instant) {
        self.notices.toggle_help(now, self.timings.help_toggle);
    }

    /// Dispatches a key press through the keybinding map.
    pub fn on_key(&mut self, key: Key, modifiers: Modifiers, now: Instant) -> Option<Action> {
        let action = lookup_action(&self.action_map, key, modifiers)?;
        self.perform(action, now);
        Some(action)
    }

    pub fn perform(&mut self, action: Action, now: Instant) {
        debug!("Performing {:?}", action);
        match action {
            Action::ClearCanvas => self.clear(),
            Action::SaveImage => {
                // Already logged and surfaced as a notice.
                let _ = self.save(now, export::timestamp_millis());
            }
            Action::ToggleEraser => self.toggle_eraser(),
            Action::ToggleHelp => self.toggle_help(now),
        }
    }

    // ------------------------------------------------------------------
    // Geometry and timers
    // ------------------------------------------------------------------

    /// Records a host resize; applied by [`Chalkboard::poll`] after the debounce delay.
    pub fn request_resize(&mut self, width: i32, height: i32, now: Instant) {
        self.resize.request(width, height, now);
    }

    /// Resizes immediately, keeping drawn content.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), SurfaceError> {
        self.surface.resize(width, height, &mut self.rng)?;
        self.tracker.set_bounds(width as f64, height as f64);
        Ok(())
    }

    /// Runs due timers: debounced resize and notice expiry.
    pub fn poll(&mut self, now: Instant) {
        if let Some((width, height)) = self.resize.poll(now) {
            if let Err(e) = self.resize(width, height) {
                warn!("Ignoring resize to {}x{}: {}", width, height, e);
            }
        }
        self.notices.expire(now);
    }
}
