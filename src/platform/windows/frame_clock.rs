//! Frame clock driven by the Desktop Window Manager.
//!
//! `DwmFlush` blocks until the next composition pass, which runs at the
//! display refresh rate while composition is on. When it fails (composition
//! off, remote session) `wait_frame` returns `None`; the tick source counts
//! each empty wait and moves to the fallback timer after a run of them.

use std::time::Instant;

use tracing::trace;
use windows::Win32::Graphics::Dwm::DwmFlush;

use crate::timing::{ClockError, FrameClock};

pub struct DwmFrameClock {
    origin: Instant,
    started: bool,
}

impl DwmFrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            started: false,
        }
    }
}

impl Default for DwmFrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for DwmFrameClock {
    fn start(&mut self) -> Result<(), ClockError> {
        // Fails here when composition is off.
        // SAFETY: DwmFlush takes no arguments and has no preconditions.
        unsafe { DwmFlush() }.map_err(|e| ClockError::Platform(e.to_string()))?;
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.started = false;
    }

    fn wait_frame(&mut self) -> Option<f64> {
        if !self.started {
            return None;
        }
        // SAFETY: see `start`.
        match unsafe { DwmFlush() } {
            Ok(()) => Some(self.origin.elapsed().as_secs_f64()),
            Err(e) => {
                trace!(target: "ticker", "DwmFlush failed: {e}");
                None
            }
        }
    }
}
