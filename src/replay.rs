//! Scripted input replay.
//!
//! A replay script is a JSON document describing a board size and a list of
//! input events. [`run`] feeds those events to a [`Chalkboard`] on a simulated
//! clock and delivers frames only when the board asked for one, the same way
//! a display would.
//!
//! ```json
//! {
//!   "width": 320,
//!   "height": 200,
//!   "events": [
//!     { "type": "mouse_down", "x": 10, "y": 10 },
//!     { "type": "mouse_move", "x": 50, "y": 10 },
//!     { "type": "frame" },
//!     { "type": "mouse_up" },
//!     { "type": "key", "key": "s" }
//!   ]
//! }
//! ```

use crate::board::Chalkboard;
use crate::draw::ColorError;
use crate::input::{Key, Modifiers, MouseButton, TouchPoint};
use crate::scheduler::{FrameOutcome, FrameRequests};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Safety net for scripts whose final drain never settles.
const MAX_DRAIN_FRAMES: usize = 1024;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid script: {0}")]
    Json(#[from] serde_json::Error),

    #[error("event {index}: {source}")]
    Color {
        index: usize,
        #[source]
        source: ColorError,
    },
}

/// A recorded input session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    MouseDown {
        #[serde(default = "default_button")]
        button: MouseButton,
        x: f64,
        y: f64,
    },
    MouseUp {
        #[serde(default = "default_button")]
        button: MouseButton,
    },
    MouseMove {
        x: f64,
        y: f64,
    },
    MouseLeave,
    TouchStart {
        touches: Vec<TouchPoint>,
    },
    TouchMove {
        touches: Vec<TouchPoint>,
    },
    TouchEnd {
        touches: Vec<TouchPoint>,
    },
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        alt: bool,
    },
    /// Delivers up to `count` display refreshes.
    Frame {
        #[serde(default = "default_frame_count")]
        count: usize,
    },
    Resize {
        width: i32,
        height: i32,
    },
    /// Advances the simulated clock.
    Wait {
        ms: u64,
    },
    Color {
        hex: String,
    },
}

fn default_button() -> MouseButton {
    MouseButton::Left
}

fn default_frame_count() -> usize {
    1
}

/// What a replay did, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub events: usize,
    pub frames: usize,
    pub points_rendered: usize,
}

pub fn parse_script(source: &str) -> Result<Script, ReplayError> {
    Ok(serde_json::from_str(source)?)
}

pub fn load_script(path: &Path) -> Result<Script, ReplayError> {
    let source = fs::read_to_string(path)?;
    let script = parse_script(&source)?;
    debug!(
        "Loaded script {} ({} events)",
        path.display(),
        script.events.len()
    );
    Ok(script)
}

/// Plays `script` against `board`, starting the simulated clock at `start`.
///
/// Any frame still requested after the last event is delivered before
/// returning, so every queued point is either rendered or was cancelled.
/// Returns the report and the simulated time the replay ended at.
pub fn run(
    board: &mut Chalkboard<FrameRequests>,
    script: &Script,
    start: Instant,
) -> Result<(ReplayReport, Instant), ReplayError> {
    let mut report = ReplayReport::default();
    let mut now = start;

    for (index, event) in script.events.iter().enumerate() {
        match event {
            Event::MouseDown { button, x, y } => board.on_mouse_press(*button, *x, *y),
            Event::MouseUp { button } => board.on_mouse_release(*button),
            Event::MouseMove { x, y } => board.on_mouse_motion(*x, *y),
            Event::MouseLeave => board.on_pointer_leave(),
            Event::TouchStart { touches } => board.on_touch_start(touches),
            Event::TouchMove { touches } => board.on_touch_move(touches),
            Event::TouchEnd { touches } => board.on_touch_end(touches),
            Event::Key {
                key,
                ctrl,
                shift,
                alt,
            } => {
                let modifiers = Modifiers {
                    ctrl: *ctrl,
                    shift: *shift,
                    alt: *alt,
                };
                if board.on_key(Key::from_name(key), modifiers, now).is_none() {
                    debug!("Event {}: key '{}' is not bound", index, key);
                }
            }
            Event::Frame { count } => {
                for _ in 0..*count {
                    if !deliver_frame(board, &mut report) {
                        break;
                    }
                }
            }
            Event::Resize { width, height } => board.request_resize(*width, *height, now),
            Event::Wait { ms } => now += Duration::from_millis(*ms),
            Event::Color { hex } => board
                .set_color(hex)
                .map_err(|source| ReplayError::Color { index, source })?,
        }

        board.poll(now);
        report.events += 1;
    }

    let mut drained = 0;
    while deliver_frame(board, &mut report) {
        drained += 1;
        if drained >= MAX_DRAIN_FRAMES {
            warn!("Frame loop did not settle after {} frames", drained);
            break;
        }
    }

    info!(
        "Replayed {} events: {} frames, {} points rendered",
        report.events, report.frames, report.points_rendered
    );
    Ok((report, now))
}

/// Runs one frame if the board requested one.
fn deliver_frame(board: &mut Chalkboard<FrameRequests>, report: &mut ReplayReport) -> bool {
    if !board.host_mut().take() {
        return false;
    }

    report.frames += 1;
    if let FrameOutcome::Rearmed { rendered } = board.on_frame() {
        report.points_rendered += rendered;
    }
    true
}
