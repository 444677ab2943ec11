//! Tick source: turns frame timestamps into delta-seconds.
//!
//! A display-refresh [`FrameClock`] is preferred. If it cannot start, stays
//! silent past the watchdog window, or keeps producing degenerate deltas or
//! empty waits, the source switches to a fixed-interval fallback timer on its own. The
//! engine above only ever sees a stream of non-negative deltas.
//!
//! This type holds no thread or timer; [`super::runner::TickerThread`] drives
//! it. Frame timestamps are only compared with each other; the `now`
//! arguments share the caller's monotonic timeline, in seconds.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::TickerConfig;

/// Failure to start a frame clock.
#[derive(Debug, Error)]
pub enum ClockError {
    #[error("no frame clock available for the active display")]
    Unavailable,
    #[error("frame clock failed: {0}")]
    Platform(String),
}

/// A display-refresh clock.
pub trait FrameClock: Send {
    fn start(&mut self) -> Result<(), ClockError>;

    fn stop(&mut self);

    /// Wait for the next frame and return its timestamp in seconds.
    ///
    /// Must return within a bounded time; `None` means no frame arrived.
    fn wait_frame(&mut self) -> Option<f64>;
}

impl FrameClock for Box<dyn FrameClock> {
    fn start(&mut self) -> Result<(), ClockError> {
        (**self).start()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn wait_frame(&mut self) -> Option<f64> {
        (**self).wait_frame()
    }
}

/// Where ticks currently come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    FrameClock,
    Fallback,
}

/// Why the source left the frame clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No frame clock, or it refused to start.
    StartFailed,
    /// No valid tick within the watchdog window.
    NoTicks,
    /// Too many consecutive near-zero or non-finite deltas.
    InvalidDeltas,
}

pub struct TickSource<C> {
    clock: Option<C>,
    config: TickerConfig,
    running: bool,
    backend: Option<Backend>,
    last_timestamp: Option<f64>,
    watchdog_deadline: Option<f64>,
    has_valid_tick: bool,
    consecutive_invalid: u32,
}

impl<C: FrameClock> TickSource<C> {
    pub fn new(clock: Option<C>, config: TickerConfig) -> Self {
        Self {
            clock,
            config,
            running: false,
            backend: None,
            last_timestamp: None,
            watchdog_deadline: None,
            has_valid_tick: false,
            consecutive_invalid: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn backend(&self) -> Option<Backend> {
        self.backend
    }

    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    pub fn clock(&self) -> Option<&C> {
        self.clock.as_ref()
    }

    /// Begin delivering ticks. No-op while running.
    pub fn start(&mut self, now: f64) {
        if self.running {
            return;
        }
        self.running = true;
        self.reset_tracking();

        let started = match self.clock.as_mut() {
            Some(clock) => match clock.start() {
                Ok(()) => true,
                Err(e) => {
                    warn!(target: "ticker", "frame clock did not start: {e}");
                    false
                }
            },
            None => false,
        };

        if started {
            self.backend = Some(Backend::FrameClock);
            self.watchdog_deadline = Some(now + self.config.watchdog.as_secs_f64());
            debug!(target: "ticker", "frame clock started");
        } else {
            self.switch_to_fallback(FallbackReason::StartFailed);
        }
    }

    /// Stop delivering ticks. Idempotent; forgets the previous timestamp so
    /// the next start does not span the idle gap.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.reset_tracking();
        self.backend = None;
        if let Some(clock) = self.clock.as_mut() {
            clock.stop();
        }
        debug!(target: "ticker", "stopped");
    }

    /// Block on the frame clock, if it is the active backend.
    pub fn wait_frame(&mut self) -> Option<f64> {
        if self.backend != Some(Backend::FrameClock) {
            return None;
        }
        self.clock.as_mut()?.wait_frame()
    }

    /// Feed a frame-clock timestamp. Returns the delta since the previous
    /// valid frame, never for the first frame after start.
    pub fn frame(&mut self, timestamp: f64) -> Option<f64> {
        if !self.running || self.backend != Some(Backend::FrameClock) {
            return None;
        }

        if !timestamp.is_finite() {
            self.record_invalid();
            return None;
        }

        let Some(previous) = self.last_timestamp.replace(timestamp) else {
            return None;
        };

        let delta = timestamp - previous;
        if !delta.is_finite() || delta <= self.config.near_zero_delta {
            self.record_invalid();
            return None;
        }

        self.consecutive_invalid = 0;
        self.has_valid_tick = true;
        self.watchdog_deadline = None;
        Some(delta)
    }

    /// The frame clock returned without a frame. Counts toward the
    /// degenerate run, so a clock that dies after delivering frames still
    /// hands over to the fallback timer.
    pub fn missed_frame(&mut self) {
        if !self.running || self.backend != Some(Backend::FrameClock) {
            return;
        }
        self.record_invalid();
    }

    /// Feed a fallback timer firing at `now`. Returns the clamped delta since
    /// the previous firing, never for the first firing.
    pub fn fallback_frame(&mut self, now: f64) -> Option<f64> {
        if !self.running || self.backend != Some(Backend::Fallback) {
            return None;
        }
        let previous = self.last_timestamp.replace(now)?;
        let delta = now - previous;
        Some(if delta.is_finite() { delta.max(0.0) } else { 0.0 })
    }

    /// Switch to the fallback timer if the frame clock has not produced a
    /// valid tick by the watchdog deadline. Returns whether it switched.
    pub fn check_watchdog(&mut self, now: f64) -> bool {
        if !self.running || self.backend != Some(Backend::FrameClock) || self.has_valid_tick {
            return false;
        }
        match self.watchdog_deadline {
            Some(deadline) if now >= deadline => {
                self.switch_to_fallback(FallbackReason::NoTicks);
                true
            }
            _ => false,
        }
    }

    fn record_invalid(&mut self) {
        self.consecutive_invalid += 1;
        if self.consecutive_invalid >= self.config.invalid_delta_threshold {
            self.switch_to_fallback(FallbackReason::InvalidDeltas);
        }
    }

    fn switch_to_fallback(&mut self, reason: FallbackReason) {
        if !self.running || self.backend == Some(Backend::Fallback) {
            return;
        }
        if self.backend == Some(Backend::FrameClock) {
            if let Some(clock) = self.clock.as_mut() {
                clock.stop();
            }
        }
        self.reset_tracking();
        self.backend = Some(Backend::Fallback);
        info!(target: "ticker", ?reason, "using fallback timer");
    }

    fn reset_tracking(&mut self) {
        self.last_timestamp = None;
        self.watchdog_deadline = None;
        self.has_valid_tick = false;
        self.consecutive_invalid = 0;
    }
}
