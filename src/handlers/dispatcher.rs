//! Event dispatcher for handling application events.
//!
//! The dispatcher receives events from the event bus and calls the
//! matching controller operation. It runs on the thread that owns the
//! controller and processes all pending events in batch.
//!
//! # Architecture
//!
//! ```text
//! EventBus::drain() → dispatch_events() → PlaybackController
//! ```

use tracing::{debug, trace};

use crate::engine::PlaybackController;
use crate::events::AppEvent;

/// What the main loop should do after a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Dispatch a batch of drained events, in order.
///
/// Events after a `RequestQuit` in the same batch are still applied so
/// nothing the user did is lost before shutdown.
pub fn dispatch_events(
    controller: &mut PlaybackController,
    events: impl IntoIterator<Item = AppEvent>,
) -> Flow {
    let mut flow = Flow::Continue;
    for event in events {
        if dispatch_single_event(controller, event) == Flow::Quit {
            flow = Flow::Quit;
        }
    }
    flow
}

/// Dispatch a single event.
pub fn dispatch_single_event(controller: &mut PlaybackController, event: AppEvent) -> Flow {
    if event.is_user_input() {
        debug!(target: "dispatch", "{}", event.description());
    } else if !matches!(event, AppEvent::Tick { .. }) {
        trace!(target: "dispatch", "{}", event.description());
    }

    match event {
        AppEvent::Tick { delta_seconds } => controller.handle_tick(delta_seconds),
        AppEvent::TogglePlayback => controller.toggle_playback(),
        AppEvent::SetPlaying(playing) => controller.set_playing(playing),
        AppEvent::ResetOffset => controller.reset_offset(),
        AppEvent::StepScript(direction) => controller.step_script(direction),
        AppEvent::ScrollScript { delta_px } => controller.scroll_script(delta_px),
        AppEvent::SetSpeed(speed) => controller.set_speed(speed),
        AppEvent::AdjustSpeed(delta) => controller.adjust_speed(delta),
        AppEvent::TogglePanel => controller.toggle_panel_visible(),
        AppEvent::ResetStopwatch => controller.reset_stopwatch(),
        AppEvent::ContentMeasured {
            content_height,
            viewport_height,
        } => controller.update_scroll_bounds(content_height, viewport_height),
        AppEvent::RecordingFinished(outcome) => {
            controller.finish_recording_command(outcome);
        }
        AppEvent::RequestQuit => return Flow::Quit,
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StepDirection;
    use crate::model::EngineConfig;
    use crate::storage::MemoryStateStore;
    use crate::timing::{ExternalTicks, ManualClock};
    use crate::TeleprompterState;

    fn controller() -> PlaybackController {
        PlaybackController::new(
            TeleprompterState::default(),
            EngineConfig::default(),
            Box::new(MemoryStateStore::new()),
            Box::new(ExternalTicks::default()),
            Box::new(ManualClock::new()),
        )
    }

    #[test]
    fn test_events_reach_controller() {
        let mut c = controller();
        let flow = dispatch_events(
            &mut c,
            [
                AppEvent::ContentMeasured {
                    content_height: 500.0,
                    viewport_height: 100.0,
                },
                AppEvent::SetSpeed(40.0),
                AppEvent::TogglePlayback,
                AppEvent::Tick { delta_seconds: 0.5 },
            ],
        );
        assert_eq!(flow, Flow::Continue);
        assert_eq!(c.state().playback.speed_px_per_sec, 40.0);
        assert!(c.is_playing());
        assert_eq!(c.state().playback.offset_px, 20.0);
    }

    #[test]
    fn test_quit_is_reported_after_batch() {
        let mut c = controller();
        let flow = dispatch_events(
            &mut c,
            [
                AppEvent::RequestQuit,
                AppEvent::StepScript(StepDirection::Down),
            ],
        );
        assert_eq!(flow, Flow::Quit);
        assert!(c.state().playback.offset_px > 0.0);
    }

    #[test]
    fn test_toggle_panel() {
        let mut c = controller();
        assert!(c.state().panel.visible);
        dispatch_single_event(&mut c, AppEvent::TogglePanel);
        assert!(!c.state().panel.visible);
    }
}
