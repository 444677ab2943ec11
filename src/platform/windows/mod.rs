//! Windows-specific implementation using the Win32 API.
//!
//! Only the DWM vblank clock lives here; everything else is portable.

mod frame_clock;

pub use frame_clock::DwmFrameClock;
