//! Time plumbing: clocks, cancellable deadlines and the tick source.
//!
//! - [`clock`]: monotonic clock abstraction (`SystemClock`, `ManualClock`)
//! - [`debounce`]: one-shot cancellable deadline shared by every timer
//! - [`ticker`]: frame-clock state machine with watchdog and fallback
//! - [`runner`]: background tick thread publishing onto the event bus

pub mod clock;
pub mod debounce;
pub mod runner;
pub mod ticker;

pub use clock::{ManualClock, MonotonicClock, SystemClock};
pub use debounce::Debounce;
pub use runner::{ExternalTicks, TickDriver, TickerThread};
pub use ticker::{Backend, ClockError, FallbackReason, FrameClock, TickSource};
