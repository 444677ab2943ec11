//! Teleprompter playback engine.
//!
//! The crate owns the one piece of real logic every teleprompter front end
//! needs: a frame-driven auto-scroll controller that advances a text offset
//! over time, clamps it against measured content bounds, and persists state
//! durably without writing on every frame. Window chrome, camera capture and
//! hotkey registration stay outside; they talk to the engine through the
//! operation surface on [`PlaybackController`] or by posting [`AppEvent`]s.
//!
//! Keep this file free of platform FFI so tests can run as normal
//! integration tests.

pub mod engine;
pub mod events;
pub mod handlers;
pub mod model;
pub mod platform;
pub mod storage;
pub mod timing;

// Re-export model types for convenience
pub use model::{EngineConfig, Limits, ScrollBounds, TeleprompterState};

// Re-export engine and event types for convenience
pub use engine::{PlaybackController, StepDirection};
pub use events::{AppEvent, EventBus, EventPublisher};

/// Clamp a value to [lo, hi]
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

/// Clamp a value to [lo, hi], replacing NaN and infinities with `fallback`
/// first.
///
/// Stored files can be hand-edited and UI sliders can produce garbage; a
/// non-finite number must never reach the scroll arithmetic.
pub fn sanitize(v: f64, fallback: f64, lo: f64, hi: f64) -> f64 {
    if v.is_finite() {
        clamp(v, lo, hi)
    } else {
        clamp(fallback, lo, hi)
    }
}

/// Format elapsed seconds as `MM:SS`, or `HH:MM:SS` from one hour up.
pub fn format_elapsed(elapsed_seconds: f64) -> String {
    let total = if elapsed_seconds.is_finite() && elapsed_seconds > 0.0 {
        elapsed_seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
