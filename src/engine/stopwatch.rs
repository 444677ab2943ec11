//! Elapsed playback time for the optional timer strip.
//!
//! Kept apart from the offset: reaching the end pauses the clock with
//! playback but does not reset it. Only an explicit reset does.

use crate::format_elapsed;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stopwatch {
    elapsed_secs: f64,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw tick time. Negative or non-finite deltas are ignored.
    pub fn accumulate(&mut self, delta_secs: f64) {
        if delta_secs.is_finite() && delta_secs > 0.0 {
            self.elapsed_secs += delta_secs;
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed_secs
    }

    /// `MM:SS`, or `HH:MM:SS` past the hour.
    pub fn label(&self) -> String {
        format_elapsed(self.elapsed_secs)
    }

    pub fn reset(&mut self) {
        self.elapsed_secs = 0.0;
    }
}
