//! Per-frame batching of queued points.
//!
//! Input can arrive faster than the display refreshes. Points are queued as
//! they come in and the whole queue is rendered once per frame. The frame
//! callback re-arms itself only while it keeps finding work, so the loop stops
//! on its own once a stroke ends.

use crate::draw::Point;
use log::{debug, trace};

/// Whatever can deliver a "next frame" callback (animation frame, vsync
/// callback, event-loop timer).
pub trait FrameHost {
    /// Requests exactly one future call of the frame callback.
    fn request_frame(&mut self);
}

/// Frame host that only records requests; the owner polls [`FrameRequests::take`].
#[derive(Debug, Default, Clone)]
pub struct FrameRequests {
    pending: bool,
    total: usize,
}

impl FrameRequests {
    /// Consumes the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of frames requested over the host's lifetime.
    pub fn total(&self) -> usize {
        self.total
    }
}

impl FrameHost for FrameRequests {
    fn request_frame(&mut self) {
        self.pending = true;
        self.total += 1;
    }
}

/// Result of one frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Points were rendered and another frame was requested.
    Rearmed { rendered: usize },
    /// The queue was empty; the loop stopped.
    Idle,
}

/// Owns the draw queue and the "frame pending" flag.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    queue: Vec<Point>,
    pending: bool,
    soft_limit: Option<usize>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a queue length above which a debug message is logged. Never enforced.
    pub fn with_soft_limit(mut self, limit: usize) -> Self {
        self.soft_limit = Some(limit);
        self
    }

    /// Appends a point and requests a frame unless one is already pending.
    pub fn enqueue(&mut self, point: Point, host: &mut dyn FrameHost) {
        self.queue.push(point);

        if let Some(limit) = self.soft_limit {
            if self.queue.len() == limit + 1 {
                debug!("Draw queue grew past {} points before a frame", limit);
            }
        }

        if !self.pending {
            self.pending = true;
            host.request_frame();
        }
    }

    /// The frame callback: drains the queue, renders it in order and re-arms.
    pub fn run_frame<F>(&mut self, host: &mut dyn FrameHost, mut render: F) -> FrameOutcome
    where
        F: FnMut(Point),
    {
        if self.queue.is_empty() {
            self.pending = false;
            trace!("Frame found empty queue; stopping");
            return FrameOutcome::Idle;
        }

        let batch = std::mem::take(&mut self.queue);
        let rendered = batch.len();
        for point in batch {
            render(point);
        }

        host.request_frame();
        FrameOutcome::Rearmed { rendered }
    }

    /// Discards queued points without rendering them.
    ///
    /// The pending flag is left alone: an already requested frame still fires
    /// and stops itself on the empty queue.
    pub fn cancel(&mut self) {
        self.queue.clear();
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn queued(&self) -> &[Point] {
        &self.queue
    }
}
