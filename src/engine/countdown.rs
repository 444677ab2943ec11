//! 3-2-1 countdown gating the start of playback.

use std::time::{Duration, Instant};

use crate::timing::Debounce;

/// What a poll of the countdown observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    Idle,
    /// Still counting; the value now shown.
    Remaining(u8),
    /// Reached zero; playback should start.
    Finished,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    seconds: u8,
    remaining: Option<u8>,
    step: Debounce,
}

impl Countdown {
    pub fn new(seconds: u8, step: Duration) -> Self {
        Self {
            seconds,
            remaining: None,
            step: Debounce::new(step),
        }
    }

    /// Begin counting from the configured value. Returns false when the
    /// countdown is zero-length, in which case the caller starts at once.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.seconds == 0 {
            return false;
        }
        self.remaining = Some(self.seconds);
        self.step.schedule(now);
        true
    }

    /// Stop counting. Returns whether a countdown was active.
    pub fn cancel(&mut self) -> bool {
        self.step.cancel();
        self.remaining.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.remaining.is_some()
    }

    /// Value currently displayed, if counting.
    pub fn remaining(&self) -> Option<u8> {
        self.remaining
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.step.deadline()
    }

    /// Apply every step whose deadline has passed.
    ///
    /// Steps are scheduled from the previous deadline, not from `now`, so a
    /// late poll does not stretch the countdown.
    pub fn poll(&mut self, now: Instant) -> CountdownStep {
        let mut stepped = false;
        while let Some(due) = self.step.deadline() {
            if !self.step.fire(now) {
                break;
            }
            stepped = true;
            match self.remaining {
                Some(n) if n > 1 => {
                    self.remaining = Some(n - 1);
                    self.step.schedule(due);
                }
                _ => {
                    self.remaining = None;
                    return CountdownStep::Finished;
                }
            }
        }
        match self.remaining {
            Some(n) if stepped => CountdownStep::Remaining(n),
            _ => CountdownStep::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn counts_down_once_per_second() {
        let t0 = Instant::now();
        let mut c = Countdown::new(3, SECOND);
        assert!(c.start(t0));
        assert_eq!(c.remaining(), Some(3));

        assert_eq!(c.poll(t0 + Duration::from_millis(500)), CountdownStep::Idle);
        assert_eq!(c.poll(t0 + SECOND), CountdownStep::Remaining(2));
        assert_eq!(c.poll(t0 + 2 * SECOND), CountdownStep::Remaining(1));
        assert_eq!(c.poll(t0 + 3 * SECOND), CountdownStep::Finished);
        assert!(!c.is_active());
        assert_eq!(c.poll(t0 + 4 * SECOND), CountdownStep::Idle);
    }

    #[test]
    fn late_poll_catches_up() {
        let t0 = Instant::now();
        let mut c = Countdown::new(3, SECOND);
        c.start(t0);
        assert_eq!(c.poll(t0 + Duration::from_millis(2500)), CountdownStep::Remaining(1));
        assert_eq!(c.deadline(), Some(t0 + 3 * SECOND));
    }

    #[test]
    fn cancel_stops_counting() {
        let t0 = Instant::now();
        let mut c = Countdown::new(3, SECOND);
        c.start(t0);
        assert!(c.cancel());
        assert!(!c.cancel());
        assert_eq!(c.poll(t0 + 10 * SECOND), CountdownStep::Idle);
    }

    #[test]
    fn zero_length_countdown_does_not_start() {
        let mut c = Countdown::new(0, SECOND);
        assert!(!c.start(Instant::now()));
        assert!(!c.is_active());
    }
}
