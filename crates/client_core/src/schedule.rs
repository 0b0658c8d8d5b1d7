use std::time::{Duration, Instant};

/// A single pending deadline. Scheduling again replaces the previous
/// deadline, so at most one revert is ever outstanding.
#[derive(Debug, Clone)]
pub struct RevertTimer {
    delay: Duration,
    due_at: Option<Instant>,
}

impl RevertTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            due_at: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.due_at = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.due_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due_at.is_some()
    }

    /// Time left before the deadline, for repaint scheduling.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.due_at.map(|due| due.saturating_duration_since(now))
    }

    /// Clears and reports a deadline that has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.due_at {
            Some(due) if due <= now => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }
}
