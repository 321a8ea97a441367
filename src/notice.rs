//! Transient on-screen notices with fixed-delay auto-dismiss.
//!
//! Hosts render whatever [`NoticeBoard::visible`] returns; the board only
//! tracks timing. Time is always passed in, never read from the clock.

use std::time::{Duration, Instant};

/// Help text shown by the help toggle and on startup.
pub const HELP_TEXT: &str = "Controls:\n\
    Draw: Left click/touch and drag\n\
    Erase: Right click and drag, or press E\n\
    Clear: Press spacebar\n\
    Save: Press 'S'";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Help,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    shows_at: Instant,
    expires_at: Instant,
}

impl Notice {
    pub fn is_visible(&self, now: Instant) -> bool {
        self.shows_at <= now && now < self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows a notice immediately for `duration`.
    pub fn post(&mut self, kind: NoticeKind, message: impl Into<String>, now: Instant, duration: Duration) {
        self.post_delayed(kind, message, now, Duration::ZERO, duration);
    }

    /// Shows a notice after `delay`, then keeps it up for `duration`.
    pub fn post_delayed(
        &mut self,
        kind: NoticeKind,
        message: impl Into<String>,
        now: Instant,
        delay: Duration,
        duration: Duration,
    ) {
        let shows_at = now + delay;
        self.notices.push(Notice {
            kind,
            message: message.into(),
            shows_at,
            expires_at: shows_at + duration,
        });
    }

    /// Hides a visible help notice, or shows one for `duration`.
    pub fn toggle_help(&mut self, now: Instant, duration: Duration) {
        let before = self.notices.len();
        self.notices
            .retain(|n| !(n.kind == NoticeKind::Help && n.is_visible(now)));

        if self.notices.len() == before {
            self.post(NoticeKind::Help, HELP_TEXT, now, duration);
        }
    }

    /// Drops notices whose time is up.
    pub fn expire(&mut self, now: Instant) {
        self.notices.retain(|n| now < n.expires_at);
    }

    pub fn visible(&self, now: Instant) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| n.is_visible(now))
    }

    pub fn is_showing(&self, kind: NoticeKind, now: Instant) -> bool {
        self.visible(now).any(|n| n.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
