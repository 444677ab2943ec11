//! Frame clock paced to the main display's refresh rate.
//!
//! The refresh rate is read from the main display's current mode when the
//! clock starts. Frames are spaced on a fixed grid from that moment, so a
//! late wake-up does not shift every following frame.

use std::thread;
use std::time::{Duration, Instant};

use core_graphics::display::CGDisplay;
use tracing::debug;

use crate::timing::{ClockError, FrameClock};

/// Used when the display reports no rate (some external panels report 0).
const DEFAULT_REFRESH_HZ: f64 = 60.0;

pub struct DisplayRateClock {
    origin: Instant,
    interval: Option<Duration>,
    next_frame: Option<Instant>,
}

impl DisplayRateClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            interval: None,
            next_frame: None,
        }
    }

    fn main_display_refresh_hz() -> Option<f64> {
        let mode = CGDisplay::main().display_mode()?;
        let hz = mode.refresh_rate();
        Some(if hz.is_finite() && hz > 0.0 {
            hz
        } else {
            DEFAULT_REFRESH_HZ
        })
    }
}

impl Default for DisplayRateClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for DisplayRateClock {
    fn start(&mut self) -> Result<(), ClockError> {
        let hz = Self::main_display_refresh_hz().ok_or(ClockError::Unavailable)?;
        let interval = Duration::from_secs_f64(1.0 / hz);
        self.interval = Some(interval);
        self.next_frame = Some(Instant::now() + interval);
        debug!(target: "ticker", hz, "display clock started");
        Ok(())
    }

    fn stop(&mut self) {
        self.interval = None;
        self.next_frame = None;
    }

    fn wait_frame(&mut self) -> Option<f64> {
        let interval = self.interval?;
        let due = self.next_frame?;

        let now = Instant::now();
        if due > now {
            thread::sleep(due - now);
        }

        // Skip frames we slept through rather than bursting to catch up.
        let mut next = due + interval;
        let now = Instant::now();
        while next <= now {
            next += interval;
        }
        self.next_frame = Some(next);

        Some(self.origin.elapsed().as_secs_f64())
    }
}
