//! Coalesced redraw scheduling.

use std::time::{Duration, Instant};

/// Delay between the last asset completion and the redraw it triggers.
pub const DEFAULT_REDRAW_DELAY: Duration = Duration::from_millis(1);

/// At most one pending redraw per board.
///
/// Every `schedule` replaces the outstanding deadline, so a burst of asset
/// completions produces a single redraw after the last one.
#[derive(Debug, Clone)]
pub struct RedrawScheduler {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for RedrawScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REDRAW_DELAY)
    }
}

impl RedrawScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule a redraw at `now + delay`, cancelling the pending one.
    pub fn schedule(&mut self, now: Instant) {
        let deadline = now + self.delay;
        if self.deadline.replace(deadline).is_some() {
            log::trace!("redraw rescheduled");
        }
    }

    /// Drop the pending redraw. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the pending redraw is due at `now`. Fires once.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
