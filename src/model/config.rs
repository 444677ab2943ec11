//! Engine configuration and clamping limits.
//!
//! Everything here has a default taken from [`super::constants`], so a
//! config file only needs the fields it wants to change.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::constants::*;

/// Which clamping ranges apply to panel geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutProfile {
    /// Notch/overlay panel on a desktop display.
    #[default]
    Desktop,
    /// Camera overlay on a phone.
    Mobile,
}

/// Inclusive clamping ranges for every bounded field of the state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub speed: (f64, f64),
    pub panel_width: (f64, f64),
    pub panel_height: (f64, f64),
    pub vertical_nudge: (f64, f64),
    pub font_size: (f64, f64),
    pub line_height: (f64, f64),
    pub letter_spacing: (f64, f64),
    pub background_opacity: (f64, f64),
    pub editor_min_width: f64,
    pub editor_min_height: f64,
}

impl Limits {
    /// Ranges used by the desktop builds.
    pub const DESKTOP: Limits = Limits {
        speed: (MIN_SPEED, MAX_SPEED),
        panel_width: (MIN_PANEL_WIDTH, MAX_PANEL_WIDTH),
        panel_height: (MIN_PANEL_HEIGHT, MAX_PANEL_HEIGHT),
        vertical_nudge: (MIN_VERTICAL_NUDGE, MAX_VERTICAL_NUDGE),
        font_size: (MIN_FONT_SIZE, MAX_FONT_SIZE),
        line_height: (MIN_LINE_HEIGHT, MAX_LINE_HEIGHT),
        letter_spacing: (MIN_LETTER_SPACING, MAX_LETTER_SPACING),
        background_opacity: (MIN_BACKGROUND_OPACITY, MAX_BACKGROUND_OPACITY),
        editor_min_width: MIN_EDITOR_WIDTH,
        editor_min_height: MIN_EDITOR_HEIGHT,
    };

    /// Ranges used on phones, where the overlay shares the screen with the
    /// camera preview.
    pub const MOBILE: Limits = Limits {
        panel_width: (MOBILE_MIN_PANEL_WIDTH, MOBILE_MAX_PANEL_WIDTH),
        panel_height: (MIN_PANEL_HEIGHT, MOBILE_MAX_PANEL_HEIGHT),
        vertical_nudge: (MOBILE_MIN_VERTICAL_NUDGE, MOBILE_MAX_VERTICAL_NUDGE),
        font_size: (MIN_FONT_SIZE, MOBILE_MAX_FONT_SIZE),
        ..Limits::DESKTOP
    };

    /// Limits for a layout profile.
    pub fn for_profile(profile: LayoutProfile) -> Limits {
        match profile {
            LayoutProfile::Desktop => Limits::DESKTOP,
            LayoutProfile::Mobile => Limits::MOBILE,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits::DESKTOP
    }
}

/// Behaviour switches and timing of the playback engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Gate play behind a 3-2-1 countdown.
    pub countdown_enabled: bool,
    /// Countdown length in seconds.
    pub countdown_seconds: u8,
    /// Track elapsed playback time for the timer strip.
    pub timer_strip_enabled: bool,
    /// Quiet interval of the debounced save.
    pub save_debounce_ms: u64,
    /// Delay before playback resumes after a manual step.
    pub step_resume_delay_ms: u64,
    /// Mutation rate cap while playing.
    pub tick_throttle_hz: f64,
    /// Persist every N committed ticks while playing.
    pub persist_every_ticks: u32,
    /// Clamping profile.
    pub profile: LayoutProfile,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            countdown_enabled: false,
            countdown_seconds: COUNTDOWN_SECONDS,
            timer_strip_enabled: false,
            save_debounce_ms: SAVE_DEBOUNCE_MS,
            step_resume_delay_ms: STEP_RESUME_DELAY_MS,
            tick_throttle_hz: TICK_THROTTLE_HZ,
            persist_every_ticks: PERSIST_EVERY_TICKS,
            profile: LayoutProfile::Desktop,
        }
    }
}

impl EngineConfig {
    /// Load config from a JSON file, returning defaults if not found or invalid.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        target: "config",
                        path = %path.display(),
                        "invalid engine config, using defaults: {e}"
                    );
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(target: "config", path = %path.display(), "cannot read engine config: {e}");
                Self::default()
            }
        }
    }

    /// Limits of the configured profile.
    pub fn limits(&self) -> Limits {
        Limits::for_profile(self.profile)
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    pub fn step_resume_delay(&self) -> Duration {
        Duration::from_millis(self.step_resume_delay_ms)
    }

    /// Minimum accumulated time before a tick is committed, in seconds.
    pub fn tick_threshold_secs(&self) -> f64 {
        if self.tick_throttle_hz.is_finite() && self.tick_throttle_hz > 0.0 {
            1.0 / self.tick_throttle_hz
        } else {
            0.0
        }
    }
}

/// Reliability parameters of the tick source.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerConfig {
    /// Time the frame clock gets to deliver its first valid tick.
    pub watchdog: Duration,
    /// Consecutive degenerate deltas that trigger the fallback timer.
    pub invalid_delta_threshold: u32,
    /// Deltas at or below this many seconds are degenerate.
    pub near_zero_delta: f64,
    /// Interval of the fallback timer.
    pub fallback_interval: Duration,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            watchdog: Duration::from_millis(WATCHDOG_MS),
            invalid_delta_threshold: INVALID_DELTA_THRESHOLD,
            near_zero_delta: NEAR_ZERO_DELTA,
            fallback_interval: Duration::from_millis(FALLBACK_INTERVAL_MS),
        }
    }
}
