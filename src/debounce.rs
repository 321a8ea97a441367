use std::time::{Duration, Instant};

/// Coalesces bursts of resize requests into one resize after a quiet period.
///
/// Each request replaces the pending size and pushes the deadline out again,
/// so only the last size of a burst is applied.
#[derive(Debug, Clone)]
pub struct ResizeDebounce {
    delay: Duration,
    pending: Option<(i32, i32, Instant)>,
}

impl ResizeDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn request(&mut self, width: i32, height: i32, now: Instant) {
        self.pending = Some((width, height, now + self.delay));
    }

    /// Returns the size to apply once the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<(i32, i32)> {
        match self.pending {
            Some((width, height, deadline)) if now >= deadline => {
                self.pending = None;
                Some((width, height))
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_to_last_size() {
        let start = Instant::now();
        let mut debounce = ResizeDebounce::new(Duration::from_millis(100));

        debounce.request(800, 600, start);
        debounce.request(900, 650, start + Duration::from_millis(50));
        assert_eq!(debounce.poll(start + Duration::from_millis(120)), None);

        assert_eq!(
            debounce.poll(start + Duration::from_millis(150)),
            Some((900, 650))
        );
        assert!(!debounce.is_pending());
        assert_eq!(debounce.poll(start + Duration::from_secs(1)), None);
    }
}
