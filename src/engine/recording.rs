//! Recording commands as seen by the engine.
//!
//! The capture pipeline runs elsewhere. The engine only guards that one
//! command is in flight at a time and applies the result when the pipeline
//! reports back, checking that the result still matches what is in flight.

use crate::model::RecordingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingCommand {
    Start,
    Pause,
    Resume,
    StopAndSave,
}

impl RecordingCommand {
    /// Status the recording must be in for a successful result to apply.
    pub fn accepts(self, status: RecordingStatus) -> bool {
        match self {
            RecordingCommand::Start => !matches!(
                status,
                RecordingStatus::Recording | RecordingStatus::Finalizing
            ),
            RecordingCommand::Pause => status == RecordingStatus::Recording,
            RecordingCommand::Resume => status == RecordingStatus::Paused,
            RecordingCommand::StopAndSave => status == RecordingStatus::Finalizing,
        }
    }
}

/// Result reported by the pipeline for one command.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingOutcome {
    pub command: RecordingCommand,
    /// Saved asset id (stop-and-save only) or the pipeline's error message.
    pub result: Result<Option<String>, String>,
}

impl RecordingOutcome {
    pub fn succeeded(command: RecordingCommand) -> Self {
        Self {
            command,
            result: Ok(None),
        }
    }

    pub fn saved(asset_id: impl Into<String>) -> Self {
        Self {
            command: RecordingCommand::StopAndSave,
            result: Ok(Some(asset_id.into())),
        }
    }

    pub fn failed(command: RecordingCommand, message: impl Into<String>) -> Self {
        Self {
            command,
            result: Err(message.into()),
        }
    }
}

/// Single-slot guard for the command in flight.
#[derive(Debug, Clone, Default)]
pub struct RecordingTracker {
    in_flight: Option<RecordingCommand>,
}

impl RecordingTracker {
    /// Claim the slot. False if another command is still running.
    pub fn begin(&mut self, command: RecordingCommand) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.in_flight = Some(command);
        true
    }

    /// Release the slot if `outcome` answers the command in flight.
    pub fn finish(&mut self, outcome: &RecordingOutcome) -> bool {
        if self.in_flight == Some(outcome.command) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    pub fn in_flight(&self) -> Option<RecordingCommand> {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_command_at_a_time() {
        let mut t = RecordingTracker::default();
        assert!(t.begin(RecordingCommand::Start));
        assert!(!t.begin(RecordingCommand::Pause));

        assert!(!t.finish(&RecordingOutcome::succeeded(RecordingCommand::Pause)));
        assert!(t.finish(&RecordingOutcome::succeeded(RecordingCommand::Start)));
        assert!(t.in_flight().is_none());
        assert!(t.begin(RecordingCommand::Pause));
    }

    #[test]
    fn commands_accept_matching_status() {
        assert!(RecordingCommand::Start.accepts(RecordingStatus::Idle));
        assert!(RecordingCommand::Start.accepts(RecordingStatus::Saved));
        assert!(!RecordingCommand::Start.accepts(RecordingStatus::Recording));
        assert!(RecordingCommand::Pause.accepts(RecordingStatus::Recording));
        assert!(!RecordingCommand::Resume.accepts(RecordingStatus::Failed));
        assert!(RecordingCommand::StopAndSave.accepts(RecordingStatus::Finalizing));
    }
}
