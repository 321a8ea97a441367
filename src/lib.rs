//! Chalk-textured freehand drawing surface.
//!
//! The library holds everything host-independent: the pixel surface, chalk and
//! eraser rendering, per-frame batching, input normalization, notices, export
//! and configuration. A host provides a [`scheduler::FrameHost`] and forwards
//! its input events to a [`Chalkboard`]; the `chalkboard` binary does that from
//! a replay script.

pub mod board;
pub mod config;
pub mod debounce;
pub mod draw;
pub mod export;
pub mod input;
pub mod notice;
pub mod replay;
pub mod scheduler;

pub use board::{BoardError, Capabilities, Chalkboard};
pub use config::Config;
