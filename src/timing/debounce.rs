//! Cancellable one-shot deadline.
//!
//! One utility backs every timer of the engine: the debounced save, the
//! auto-resume after a manual step, and each countdown step. Scheduling
//! again replaces the pending deadline, so bursts collapse into one firing
//! after the last call. Nothing runs by itself; the owner polls
//! [`Debounce::fire`] from its loop and re-checks its own condition before
//! acting.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debounce {
    delay: Duration,
    due: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)arm the deadline at `now + delay`, dropping any pending one.
    pub fn schedule(&mut self, now: Instant) {
        self.due = Some(now + self.delay);
    }

    /// Drop the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.due.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.due
    }

    /// Consume the deadline if it has passed. Returns true at most once per
    /// schedule.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(200);

    #[test]
    fn fires_once_after_delay() {
        let t0 = Instant::now();
        let mut d = Debounce::new(DELAY);
        d.schedule(t0);

        assert!(!d.fire(t0 + Duration::from_millis(199)));
        assert!(d.fire(t0 + DELAY));
        assert!(!d.fire(t0 + Duration::from_secs(5)));
        assert!(!d.is_pending());
    }

    #[test]
    fn rescheduling_pushes_deadline_back() {
        let t0 = Instant::now();
        let mut d = Debounce::new(DELAY);
        d.schedule(t0);
        d.schedule(t0 + Duration::from_millis(150));

        assert!(!d.fire(t0 + Duration::from_millis(250)));
        assert!(d.fire(t0 + Duration::from_millis(350)));
    }

    #[test]
    fn cancel_prevents_firing() {
        let t0 = Instant::now();
        let mut d = Debounce::new(DELAY);
        assert!(!d.cancel());

        d.schedule(t0);
        assert!(d.cancel());
        assert!(!d.fire(t0 + Duration::from_secs(1)));
        assert_eq!(d.deadline(), None);
    }
}
