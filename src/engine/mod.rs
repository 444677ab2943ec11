//! Playback/scroll engine.
//!
//! - [`scroll`]: per-tick arithmetic, step size, tick throttle
//! - [`controller`]: `PlaybackController`, the single state owner
//! - [`countdown`]: 3-2-1 start gate
//! - [`stopwatch`]: elapsed playback time for the timer strip
//! - [`recording`]: recording commands and their results

pub mod controller;
pub mod countdown;
pub mod recording;
pub mod scroll;
pub mod stopwatch;

pub use controller::PlaybackController;
pub use countdown::{Countdown, CountdownStep};
pub use recording::{RecordingCommand, RecordingOutcome, RecordingTracker};
pub use scroll::{StepDirection, TickThrottle};
pub use stopwatch::Stopwatch;
