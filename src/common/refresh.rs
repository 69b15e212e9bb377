//! A polling gate used to approximate live updates while a path is being dragged.

use std::time::{Duration, Instant};

/// Decides whether a periodic tick is due. The host calls `due` from its own timer or event
/// loop; the throttle only records when the last tick was accepted.
#[derive(Debug, Clone)]
pub struct RefreshThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl RefreshThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns true and records `now` if at least one interval has passed since the last accepted
    /// tick, or if no tick has been accepted yet.
    pub fn due(&mut self, now: Instant) -> bool {
        let ready = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };

        if ready {
            self.last = Some(now);
        }
        ready
    }
}
