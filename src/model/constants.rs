//! Configuration constants and default values.
//!
//! This module contains all application constants including state defaults,
//! persisted file names, timing parameters and validation limits.

// === Playback Defaults ===

/// Default scroll speed in pixels per second.
pub const DEFAULT_SPEED_PX_PER_SEC: f64 = 20.0;

/// Default script shown on first launch.
pub const DEFAULT_SCRIPT_TEXT: &str = "Notchy is a native teleprompter that keeps your script \
directly beside the camera.\n\nWrite or paste your script into the editor window. Press Space \
to play or pause scrolling.\n\nAdjust speed, font size, and layout in real time. Everything is \
saved automatically, so your script is always ready when you return.";

// === Panel Defaults ===

/// Default panel width in pixels.
pub const DEFAULT_PANEL_WIDTH: f64 = 358.0;

/// Default panel height in pixels.
pub const DEFAULT_PANEL_HEIGHT: f64 = 118.0;

/// Default vertical nudge from the top anchor, in pixels.
pub const DEFAULT_VERTICAL_NUDGE_PX: f64 = 0.0;

/// Default panel background opacity [0.0, 1.0].
pub const DEFAULT_BACKGROUND_OPACITY: f64 = 0.95;

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE_PX: f64 = 14.0;

/// Default line height multiplier.
pub const DEFAULT_LINE_HEIGHT: f64 = 1.06;

/// Default letter spacing in pixels.
pub const DEFAULT_LETTER_SPACING_PX: f64 = 0.0;

// === Editor Defaults ===

/// Default editor window width in pixels.
pub const DEFAULT_EDITOR_WIDTH: f64 = 860.0;

/// Default editor window height in pixels.
pub const DEFAULT_EDITOR_HEIGHT: f64 = 700.0;

// === Persistence ===

/// Directory name under the per-user application data directory.
pub const STATE_DIR_NAME: &str = "NotchyTeleprompter";

/// File name of the persisted state.
pub const STATE_FILE_NAME: &str = "state.json";

/// Directory name of the legacy (Electron) store.
pub const LEGACY_DIR_NAME: &str = "notchy-mac-app";

/// File name of the legacy (Electron) store.
pub const LEGACY_FILE_NAME: &str = "notchy-teleprompter.json";

/// Legacy windows were placed at an absolute top offset; anything at or
/// above this is re-anchored below the menu bar on import.
pub const LEGACY_ANCHOR_THRESHOLD_PX: f64 = 24.0;

/// Menu bar height subtracted from legacy absolute top offsets.
pub const LEGACY_MENU_BAR_PX: f64 = 34.0;

// === Engine Timing ===

/// Ticks are batched until this many per second worth of time accumulated.
pub const TICK_THROTTLE_HZ: f64 = 45.0;

/// Persist the offset every N committed ticks while playing.
pub const PERSIST_EVERY_TICKS: u32 = 18;

/// Quiet interval before a debounced save is written, in milliseconds.
pub const SAVE_DEBOUNCE_MS: u64 = 200;

/// Delay before playback resumes after a manual step, in milliseconds.
pub const STEP_RESUME_DELAY_MS: u64 = 350;

/// Countdown length in seconds before playback starts.
pub const COUNTDOWN_SECONDS: u8 = 3;

/// Interval between countdown steps, in milliseconds.
pub const COUNTDOWN_STEP_MS: u64 = 1000;

/// Smallest manual step, in pixels.
pub const MIN_STEP_PX: f64 = 8.0;

// === Tick Source ===

/// Time the frame clock gets to deliver its first valid tick, in milliseconds.
pub const WATCHDOG_MS: u64 = 450;

/// Consecutive degenerate deltas before switching to the fallback timer.
pub const INVALID_DELTA_THRESHOLD: u32 = 12;

/// Deltas at or below this many seconds count as degenerate.
pub const NEAR_ZERO_DELTA: f64 = 1e-6;

/// Fallback timer interval, in milliseconds.
pub const FALLBACK_INTERVAL_MS: u64 = 16;

// === Validation Limits (desktop) ===

/// Minimum scroll speed in pixels per second.
pub const MIN_SPEED: f64 = 4.0;

/// Maximum scroll speed in pixels per second.
pub const MAX_SPEED: f64 = 260.0;

/// Minimum panel width in pixels.
pub const MIN_PANEL_WIDTH: f64 = 220.0;

/// Maximum panel width in pixels.
pub const MAX_PANEL_WIDTH: f64 = 1400.0;

/// Minimum panel height in pixels.
pub const MIN_PANEL_HEIGHT: f64 = 90.0;

/// Maximum panel height in pixels.
pub const MAX_PANEL_HEIGHT: f64 = 600.0;

/// Minimum vertical nudge in pixels.
pub const MIN_VERTICAL_NUDGE: f64 = -70.0;

/// Maximum vertical nudge in pixels.
pub const MAX_VERTICAL_NUDGE: f64 = 220.0;

/// Minimum font size in pixels.
pub const MIN_FONT_SIZE: f64 = 10.0;

/// Maximum font size in pixels.
pub const MAX_FONT_SIZE: f64 = 110.0;

/// Minimum line height multiplier.
pub const MIN_LINE_HEIGHT: f64 = 1.0;

/// Maximum line height multiplier.
pub const MAX_LINE_HEIGHT: f64 = 2.2;

/// Minimum letter spacing in pixels.
pub const MIN_LETTER_SPACING: f64 = -0.5;

/// Maximum letter spacing in pixels.
pub const MAX_LETTER_SPACING: f64 = 8.0;

/// Minimum background opacity.
pub const MIN_BACKGROUND_OPACITY: f64 = 0.3;

/// Maximum background opacity.
pub const MAX_BACKGROUND_OPACITY: f64 = 1.0;

/// Minimum editor window width in pixels.
pub const MIN_EDITOR_WIDTH: f64 = 680.0;

/// Minimum editor window height in pixels.
pub const MIN_EDITOR_HEIGHT: f64 = 520.0;

// === Validation Limits (mobile overrides) ===

/// Maximum font size on phones.
pub const MOBILE_MAX_FONT_SIZE: f64 = 56.0;

/// Minimum overlay width on phones.
pub const MOBILE_MIN_PANEL_WIDTH: f64 = 200.0;

/// Maximum overlay width on phones.
pub const MOBILE_MAX_PANEL_WIDTH: f64 = 390.0;

/// Maximum overlay height on phones.
pub const MOBILE_MAX_PANEL_HEIGHT: f64 = 320.0;

/// Minimum vertical offset on phones.
pub const MOBILE_MIN_VERTICAL_NUDGE: f64 = -40.0;

/// Maximum vertical offset on phones.
pub const MOBILE_MAX_VERTICAL_NUDGE: f64 = 260.0;
