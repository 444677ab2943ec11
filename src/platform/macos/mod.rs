//! macOS-specific implementation using CoreGraphics.
//!
//! Only the display-paced frame clock lives here; everything else is
//! portable.

mod frame_clock;

pub use frame_clock::DisplayRateClock;
