//! Application events for inter-module communication.
//!
//! These events represent frame ticks, user requests and collaborator
//! results that can be published by any thread and applied by the
//! dispatcher on the thread that owns the controller.
//! This module is pure Rust with no FFI dependencies, making it fully testable.

use crate::engine::{RecordingOutcome, StepDirection};

/// Application-level events for decoupled communication between modules.
///
/// Events flow from producers (tick thread, hotkeys, IPC, UI) through the
/// EventBus to the dispatcher, which calls the matching controller operation.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // === Clock ===
    /// Elapsed time since the previous tick.
    Tick { delta_seconds: f64 },

    // === Input Events ===
    /// Play/pause (Space, or the panel button)
    TogglePlayback,

    /// Force playback on or off (IPC)
    SetPlaying(bool),

    /// Jump back to the top and pause
    ResetOffset,

    /// Move one text line (arrow keys)
    StepScript(StepDirection),

    /// Continuous drag or wheel scroll
    ScrollScript { delta_px: f64 },

    /// Set speed from a slider
    SetSpeed(f64),

    /// Faster/slower hotkeys
    AdjustSpeed(f64),

    /// Show or hide the panel
    TogglePanel,

    /// Reset the elapsed-time strip
    ResetStopwatch,

    // === Collaborator Results ===
    /// The UI laid out the script and measured it
    ContentMeasured {
        content_height: f64,
        viewport_height: f64,
    },

    /// The recording pipeline finished a command
    RecordingFinished(RecordingOutcome),

    // === System Events ===
    /// Leave the main loop
    RequestQuit,
}

impl AppEvent {
    /// Returns true for events caused directly by the user.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            AppEvent::TogglePlayback
                | AppEvent::SetPlaying(_)
                | AppEvent::ResetOffset
                | AppEvent::StepScript(_)
                | AppEvent::ScrollScript { .. }
                | AppEvent::SetSpeed(_)
                | AppEvent::AdjustSpeed(_)
                | AppEvent::TogglePanel
                | AppEvent::ResetStopwatch
        )
    }

    /// Returns a human-readable description of the event for debugging.
    pub fn description(&self) -> &'static str {
        match self {
            AppEvent::Tick { .. } => "Frame tick",
            AppEvent::TogglePlayback => "Toggle playback",
            AppEvent::SetPlaying(_) => "Set playing",
            AppEvent::ResetOffset => "Reset offset",
            AppEvent::StepScript(_) => "Step script one line",
            AppEvent::ScrollScript { .. } => "Scroll script",
            AppEvent::SetSpeed(_) => "Set speed",
            AppEvent::AdjustSpeed(_) => "Adjust speed",
            AppEvent::TogglePanel => "Toggle panel visibility",
            AppEvent::ResetStopwatch => "Reset stopwatch",
            AppEvent::ContentMeasured { .. } => "Content measured",
            AppEvent::RecordingFinished(_) => "Recording command finished",
            AppEvent::RequestQuit => "Request quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RecordingCommand;

    #[test]
    fn test_user_input_events() {
        assert!(AppEvent::TogglePlayback.is_user_input());
        assert!(AppEvent::StepScript(StepDirection::Down).is_user_input());
        assert!(AppEvent::ScrollScript { delta_px: 4.0 }.is_user_input());
        assert!(AppEvent::AdjustSpeed(-2.0).is_user_input());
    }

    #[test]
    fn test_machine_events_are_not_user_input() {
        assert!(!AppEvent::Tick { delta_seconds: 0.016 }.is_user_input());
        assert!(!AppEvent::ContentMeasured {
            content_height: 400.0,
            viewport_height: 120.0
        }
        .is_user_input());
        assert!(!AppEvent::RecordingFinished(RecordingOutcome::succeeded(
            RecordingCommand::Pause
        ))
        .is_user_input());
        assert!(!AppEvent::RequestQuit.is_user_input());
    }

    #[test]
    fn test_event_equality() {
        assert_eq!(AppEvent::SetSpeed(40.0), AppEvent::SetSpeed(40.0));
        assert_ne!(AppEvent::SetSpeed(40.0), AppEvent::SetSpeed(41.0));
        assert_ne!(AppEvent::TogglePlayback, AppEvent::TogglePanel);
    }

    #[test]
    fn test_event_debug() {
        let event = AppEvent::TogglePlayback;
        assert_eq!(format!("{:?}", event), "TogglePlayback");
    }

    #[test]
    fn test_all_events_have_descriptions() {
        let events = [
            AppEvent::Tick { delta_seconds: 0.0 },
            AppEvent::TogglePlayback,
            AppEvent::SetPlaying(true),
            AppEvent::ResetOffset,
            AppEvent::StepScript(StepDirection::Up),
            AppEvent::ScrollScript { delta_px: 1.0 },
            AppEvent::SetSpeed(20.0),
            AppEvent::AdjustSpeed(2.0),
            AppEvent::TogglePanel,
            AppEvent::ResetStopwatch,
            AppEvent::ContentMeasured {
                content_height: 0.0,
                viewport_height: 0.0,
            },
            AppEvent::RequestQuit,
        ];

        for event in events {
            assert!(!event.description().is_empty());
        }
    }
}
