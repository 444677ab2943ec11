//! Application state (pure Rust, no FFI).
//!
//! This module defines the teleprompter state that is persisted to
//! `state.json`. Every struct back-fills missing fields from its defaults
//! when deserialized, so files written by older builds (or edited by hand)
//! still load; [`TeleprompterState::validate`] then pulls every field back
//! into range.

use serde::{Deserialize, Serialize};

use super::config::Limits;
use super::constants::*;
use crate::sanitize;

/// Scroll position and speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaybackState {
    /// Is the script scrolling?
    pub is_playing: bool,
    /// Scroll speed in pixels per second.
    pub speed_px_per_sec: f64,
    /// Distance scrolled from the top of the content, in pixels.
    pub offset_px: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            speed_px_per_sec: DEFAULT_SPEED_PX_PER_SEC,
            offset_px: 0.0,
        }
    }
}

/// Overlay panel geometry and text styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanelState {
    pub width: f64,
    pub height: f64,
    /// Offset from the top anchor, in pixels.
    pub vertical_nudge_px: f64,
    pub background_opacity: f64,
    pub font_size_px: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    pub letter_spacing_px: f64,
    pub visible: bool,
    /// Hide the panel from screen capture and screen sharing.
    pub exclude_from_capture: bool,
    /// Show the elapsed-time strip under the panel.
    pub show_timer: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            width: DEFAULT_PANEL_WIDTH,
            height: DEFAULT_PANEL_HEIGHT,
            vertical_nudge_px: DEFAULT_VERTICAL_NUDGE_PX,
            background_opacity: DEFAULT_BACKGROUND_OPACITY,
            font_size_px: DEFAULT_FONT_SIZE_PX,
            line_height: DEFAULT_LINE_HEIGHT,
            letter_spacing_px: DEFAULT_LETTER_SPACING_PX,
            visible: true,
            exclude_from_capture: true,
            show_timer: false,
        }
    }
}

impl PanelState {
    /// Height of one rendered line of text, in pixels.
    pub fn line_height_px(&self) -> f64 {
        self.font_size_px * self.line_height
    }
}

/// Editor window frame. The origin is unset until the user moves the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorState {
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_y: Option<f64>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            width: DEFAULT_EDITOR_WIDTH,
            height: DEFAULT_EDITOR_HEIGHT,
            origin_x: None,
            origin_y: None,
        }
    }
}

/// Keyboard remote-control toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyboardState {
    pub remote_mode_enabled: bool,
    pub consume_keys_when_remote: bool,
}

/// Lifecycle of a camera recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingStatus {
    #[default]
    Idle,
    Recording,
    Paused,
    Finalizing,
    Saved,
    Failed,
}

impl RecordingStatus {
    /// Statuses that only make sense while a pipeline is running.
    pub fn is_transient(self) -> bool {
        matches!(self, RecordingStatus::Recording | RecordingStatus::Finalizing)
    }
}

/// Recording substate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordingState {
    pub status: RecordingStatus,
    /// Recorded time in seconds.
    pub duration_sec: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_saved_asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Complete teleprompter state, serializable to/from `state.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeleprompterState {
    pub script_text: String,
    pub playback: PlaybackState,
    pub panel: PanelState,
    pub editor: EditorState,
    pub keyboard: KeyboardState,
    pub recording: RecordingState,
    /// Set once the legacy store has been imported (or found absent).
    pub migration_completed: bool,
}

impl Default for TeleprompterState {
    fn default() -> Self {
        Self {
            script_text: DEFAULT_SCRIPT_TEXT.to_string(),
            playback: PlaybackState::default(),
            panel: PanelState::default(),
            editor: EditorState::default(),
            keyboard: KeyboardState::default(),
            recording: RecordingState::default(),
            migration_completed: false,
        }
    }
}

impl TeleprompterState {
    /// Validates and clamps all values to valid ranges.
    ///
    /// Non-finite numbers fall back to the field default before clamping.
    /// The offset only has a floor here; its ceiling depends on measured
    /// content and is enforced by the engine.
    pub fn validate(&mut self, limits: &Limits) {
        let playback = PlaybackState::default();
        let panel = PanelState::default();
        let editor = EditorState::default();

        let (lo, hi) = limits.speed;
        self.playback.speed_px_per_sec =
            sanitize(self.playback.speed_px_per_sec, playback.speed_px_per_sec, lo, hi);
        self.playback.offset_px = sanitize(self.playback.offset_px, 0.0, 0.0, f64::MAX);

        let p = &mut self.panel;
        let (lo, hi) = limits.panel_width;
        p.width = sanitize(p.width, panel.width, lo, hi);
        let (lo, hi) = limits.panel_height;
        p.height = sanitize(p.height, panel.height, lo, hi);
        let (lo, hi) = limits.vertical_nudge;
        p.vertical_nudge_px = sanitize(p.vertical_nudge_px, panel.vertical_nudge_px, lo, hi);
        let (lo, hi) = limits.background_opacity;
        p.background_opacity = sanitize(p.background_opacity, panel.background_opacity, lo, hi);
        let (lo, hi) = limits.font_size;
        p.font_size_px = sanitize(p.font_size_px, panel.font_size_px, lo, hi);
        let (lo, hi) = limits.line_height;
        p.line_height = sanitize(p.line_height, panel.line_height, lo, hi);
        let (lo, hi) = limits.letter_spacing;
        p.letter_spacing_px = sanitize(p.letter_spacing_px, panel.letter_spacing_px, lo, hi);

        let e = &mut self.editor;
        e.width = sanitize(e.width, editor.width, limits.editor_min_width, f64::MAX);
        e.height = sanitize(e.height, editor.height, limits.editor_min_height, f64::MAX);
        e.origin_x = e.origin_x.filter(|x| x.is_finite());
        e.origin_y = e.origin_y.filter(|y| y.is_finite());

        self.recording.duration_sec = sanitize(self.recording.duration_sec, 0.0, 0.0, f64::MAX);
    }

    /// Returns a validated copy.
    pub fn clamped(mut self, limits: &Limits) -> Self {
        self.validate(limits);
        self
    }

    /// Default settings with this state's script kept.
    pub fn reset_keeping_script(&self) -> Self {
        Self {
            script_text: self.script_text.clone(),
            migration_completed: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_field_names() {
        let json = serde_json::to_value(TeleprompterState::default()).unwrap();
        assert!(json.get("scriptText").is_some());
        assert!(json["playback"].get("speedPxPerSec").is_some());
        assert!(json["panel"].get("letterSpacingPx").is_some());
        assert!(json["editor"].get("originX").is_none());
        assert_eq!(json["recording"]["status"], "idle");
    }

    #[test]
    fn empty_object_deserializes_to_defaults() {
        let state: TeleprompterState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, TeleprompterState::default());
    }

    #[test]
    fn validate_replaces_non_finite_with_defaults() {
        let mut state = TeleprompterState::default();
        state.playback.speed_px_per_sec = f64::NAN;
        state.playback.offset_px = f64::INFINITY;
        state.panel.font_size_px = f64::NEG_INFINITY;
        state.editor.origin_x = Some(f64::NAN);
        state.validate(&Limits::DESKTOP);

        assert_eq!(state.playback.speed_px_per_sec, DEFAULT_SPEED_PX_PER_SEC);
        assert_eq!(state.playback.offset_px, 0.0);
        assert_eq!(state.panel.font_size_px, DEFAULT_FONT_SIZE_PX);
        assert_eq!(state.editor.origin_x, None);
    }

    #[test]
    fn transient_recording_statuses() {
        assert!(RecordingStatus::Recording.is_transient());
        assert!(RecordingStatus::Finalizing.is_transient());
        assert!(!RecordingStatus::Paused.is_transient());
        assert!(!RecordingStatus::Saved.is_transient());
    }
}
