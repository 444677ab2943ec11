//! Platform-specific frame clocks.
//!
//! Each platform module provides the display-refresh clock the tick source
//! prefers:
//! - Windows: `DwmFlush`, which returns once per desktop composition pass
//! - macOS: a clock paced to the main display's refresh rate
//!
//! Other targets have no frame clock and tick from the fallback timer.

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "windows")]
pub mod windows;

use crate::timing::FrameClock;

/// The preferred frame clock on this platform, if there is one.
pub fn primary_frame_clock() -> Option<Box<dyn FrameClock>> {
    #[cfg(target_os = "windows")]
    {
        Some(Box::new(windows::DwmFrameClock::new()))
    }

    #[cfg(target_os = "macos")]
    {
        Some(Box::new(macos::DisplayRateClock::new()))
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        None
    }
}
