//! The state owner.
//!
//! [`PlaybackController`] holds the only mutable copy of the
//! [`TeleprompterState`]. Everything that wants a change (ticks, hotkeys,
//! IPC, the editor UI, the recording pipeline) goes through one of its
//! methods on the owning thread. Every mutation is followed by the same
//! commit step: clamp, re-measure if a layout input changed, enforce the
//! scroll bounds, start or stop the tick source, notify subscribers, and
//! hand the state to the persistence gate.
//!
//! Timers (debounced save, auto-resume after a step, countdown) are
//! deadlines. The host calls [`PlaybackController::poll_timers`] from its
//! loop, waking no later than [`PlaybackController::next_deadline`].

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::countdown::{Countdown, CountdownStep};
use super::recording::{RecordingCommand, RecordingOutcome, RecordingTracker};
use super::scroll::{self, StepDirection, TickThrottle};
use super::stopwatch::Stopwatch;
use crate::model::{
    ContentMeasurer, EngineConfig, Limits, RecordingStatus, ScrollBounds, TeleprompterState,
    TextLayout, COUNTDOWN_STEP_MS,
};
use crate::storage::{LegacyImporter, PersistenceGate, StateStore};
use crate::timing::{Debounce, MonotonicClock, TickDriver};

type Listener = Box<dyn FnMut(&TeleprompterState)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Persist {
    Soon,
    Now,
}

pub struct PlaybackController {
    state: TeleprompterState,
    config: EngineConfig,
    limits: Limits,
    bounds: Option<ScrollBounds>,
    gate: PersistenceGate,
    ticker: Box<dyn TickDriver>,
    clock: Box<dyn MonotonicClock>,
    throttle: TickThrottle,
    resume: Debounce,
    countdown: Countdown,
    stopwatch: Stopwatch,
    recording: RecordingTracker,
    measurer: Option<Box<dyn ContentMeasurer>>,
    measured_layout: Option<TextLayout>,
    listeners: Vec<Listener>,
}

impl PlaybackController {
    /// Take ownership of `state` (clamped on the way in).
    pub fn new(
        state: TeleprompterState,
        config: EngineConfig,
        store: Box<dyn StateStore>,
        ticker: Box<dyn TickDriver>,
        clock: Box<dyn MonotonicClock>,
    ) -> Self {
        let limits = config.limits();
        let gate = PersistenceGate::new(
            store,
            limits,
            config.save_debounce(),
            config.persist_every_ticks,
        );
        let mut controller = Self {
            state: state.clamped(&limits),
            throttle: TickThrottle::new(config.tick_threshold_secs()),
            resume: Debounce::new(config.step_resume_delay()),
            countdown: Countdown::new(
                config.countdown_seconds,
                Duration::from_millis(COUNTDOWN_STEP_MS),
            ),
            config,
            limits,
            bounds: None,
            gate,
            ticker,
            clock,
            stopwatch: Stopwatch::new(),
            recording: RecordingTracker::default(),
            measurer: None,
            measured_layout: None,
            listeners: Vec::new(),
        };
        controller.sync_ticker();
        controller
    }

    /// Load the initial state from `store` (or `importer`, or defaults),
    /// write it back once, and take ownership of the store.
    pub fn bootstrap(
        store: Box<dyn StateStore>,
        importer: &dyn LegacyImporter,
        config: EngineConfig,
        ticker: Box<dyn TickDriver>,
        clock: Box<dyn MonotonicClock>,
    ) -> Self {
        let state = crate::storage::load_initial_state(store.as_ref(), importer, &config.limits());
        Self::new(state, config, store, ticker, clock)
    }

    /// Measure content with `measurer` from now on, re-measuring whenever
    /// the script or its styling changes.
    pub fn with_measurer(mut self, measurer: Box<dyn ContentMeasurer>) -> Self {
        self.measurer = Some(measurer);
        self.measured_layout = None;
        if self.refresh_measurement() {
            self.settle();
        }
        self
    }

    // ===== Accessors =====

    pub fn state(&self) -> &TeleprompterState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn bounds(&self) -> Option<ScrollBounds> {
        self.bounds
    }

    /// Scroll ceiling, or `None` until content has been measured.
    pub fn max_offset_px(&self) -> Option<f64> {
        self.bounds.map(|b| b.max_offset_px())
    }

    pub fn is_playing(&self) -> bool {
        self.state.playback.is_playing
    }

    pub fn is_ticker_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// Paused by a manual step, waiting to resume.
    pub fn is_resume_pending(&self) -> bool {
        self.resume.is_pending()
    }

    pub fn countdown_value(&self) -> Option<u8> {
        self.countdown.remaining()
    }

    pub fn is_countdown_active(&self) -> bool {
        self.countdown.is_active()
    }

    pub fn recording_in_flight(&self) -> Option<RecordingCommand> {
        self.recording.in_flight()
    }

    pub fn persistence_failures(&self) -> usize {
        self.gate.failed_writes()
    }

    /// Register a callback run after every committed change.
    pub fn subscribe(&mut self, listener: impl FnMut(&TeleprompterState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // ===== Ticks =====

    /// Apply one tick of `delta_seconds`.
    pub fn handle_tick(&mut self, delta_seconds: f64) {
        let dt = if delta_seconds.is_finite() {
            delta_seconds.max(0.0)
        } else {
            0.0
        };

        let recording = self.state.recording.status == RecordingStatus::Recording;
        if recording {
            self.state.recording.duration_sec += dt;
        }

        if !self.state.playback.is_playing {
            if recording {
                self.settle();
            }
            return;
        }

        if self.config.timer_strip_enabled {
            self.stopwatch.accumulate(dt);
        }

        let Some(effective) = self.throttle.push(dt) else {
            if recording {
                self.settle();
            }
            return;
        };

        let step = scroll::advance(
            self.state.playback.offset_px,
            self.state.playback.speed_px_per_sec,
            effective,
            self.max_offset_px(),
        );
        self.state.playback.offset_px = step.offset_px;
        if step.reached_end {
            self.state.playback.is_playing = false;
            info!(target: "engine", offset = step.offset_px, "reached end of script, pausing");
        }
        self.settle();
        self.gate.note_tick_commit(step.reached_end, &self.state);
    }

    // ===== Playback =====

    /// Play/pause. Starting may go through the countdown; pressing again
    /// during the countdown cancels it.
    pub fn toggle_playback(&mut self) {
        if self.countdown.cancel() {
            info!(target: "engine", "countdown cancelled");
            self.notify();
            return;
        }

        if self.state.playback.is_playing {
            self.stop_playback();
            return;
        }
        if self.resume.cancel() {
            debug!(target: "engine", "toggle took over pending auto-resume");
        }

        if self.config.countdown_enabled && self.countdown.start(self.clock.now()) {
            info!(target: "engine", seconds = self.config.countdown_seconds, "countdown started");
            self.notify();
            return;
        }

        self.start_playback();
    }

    /// Force playback on or off, skipping the countdown.
    pub fn set_playing(&mut self, playing: bool) {
        self.countdown.cancel();
        if playing {
            self.resume.cancel();
            if !self.state.playback.is_playing {
                self.start_playback();
            }
        } else if self.state.playback.is_playing {
            self.stop_playback();
        } else {
            self.resume.cancel();
            self.notify();
        }
    }

    /// Move one text line. Playback pauses and resumes on its own after a
    /// short idle delay; stepping again restarts that delay.
    pub fn step_script(&mut self, direction: StepDirection) {
        let step = scroll::step_px(self.state.panel.font_size_px, self.state.panel.line_height);
        let target = self.state.playback.offset_px + direction.sign() * step;
        self.state.playback.offset_px = scroll::clamp_offset(target, self.max_offset_px());

        if self.state.playback.is_playing {
            self.state.playback.is_playing = false;
            self.resume.schedule(self.clock.now());
            debug!(target: "engine", "paused for manual step");
        } else if self.resume.is_pending() {
            self.resume.schedule(self.clock.now());
        }
        self.commit(Persist::Soon);
    }

    /// Continuous drag or wheel scroll. A pending auto-resume is taken over:
    /// playback resumes immediately.
    pub fn scroll_script(&mut self, delta_px: f64) {
        if delta_px == 0.0 || !delta_px.is_finite() {
            return;
        }
        if self.resume.cancel() {
            self.state.playback.is_playing = true;
            debug!(target: "engine", "scroll resumed playback");
        }
        let target = self.state.playback.offset_px + delta_px;
        self.state.playback.offset_px = scroll::clamp_offset(target, self.max_offset_px());
        self.commit(Persist::Soon);
    }

    /// Jump to the top and pause.
    pub fn reset_offset(&mut self) {
        self.countdown.cancel();
        self.resume.cancel();
        self.state.playback.offset_px = 0.0;
        self.state.playback.is_playing = false;
        self.commit(Persist::Now);
    }

    // ===== Speed =====

    pub fn set_speed(&mut self, speed_px_per_sec: f64) {
        if !speed_px_per_sec.is_finite() {
            return;
        }
        self.state.playback.speed_px_per_sec = speed_px_per_sec;
        self.commit(Persist::Soon);
    }

    pub fn adjust_speed(&mut self, delta_px_per_sec: f64) {
        if !delta_px_per_sec.is_finite() {
            return;
        }
        self.state.playback.speed_px_per_sec += delta_px_per_sec;
        self.commit(Persist::Soon);
    }

    /// Multiply the speed. Ignored unless `multiplier > 0`.
    pub fn scale_speed(&mut self, multiplier: f64) {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return;
        }
        self.state.playback.speed_px_per_sec *= multiplier;
        self.commit(Persist::Soon);
    }

    // ===== Bounds =====

    /// Record freshly measured sizes. Only touches the state if the offset
    /// no longer fits or nothing is left to scroll.
    pub fn update_scroll_bounds(&mut self, content_height: f64, viewport_height: f64) {
        let bounds = ScrollBounds::new(content_height, viewport_height);
        debug!(
            target: "engine",
            content = bounds.content_height,
            viewport = bounds.viewport_height,
            max = bounds.max_offset_px(),
            "scroll bounds updated"
        );
        self.bounds = Some(bounds);
        if self.enforce_bounds() {
            self.commit(Persist::Soon);
        }
    }

    /// Measure again with the installed measurer, even if no layout input
    /// changed (fonts loaded, display scale changed).
    pub fn remeasure(&mut self) {
        self.measured_layout = None;
        if self.refresh_measurement() && self.enforce_bounds() {
            self.commit(Persist::Soon);
        }
    }

    // ===== Timers =====

    /// Run every timer whose deadline has passed.
    pub fn poll_timers(&mut self) {
        let now = self.clock.now();

        if self.resume.fire(now)
            && !self.state.playback.is_playing
            && !self.countdown.is_active()
        {
            info!(target: "engine", "auto-resuming after manual step");
            self.state.playback.is_playing = true;
            self.commit(Persist::Soon);
        }

        match self.countdown.poll(now) {
            CountdownStep::Idle => {}
            CountdownStep::Remaining(n) => {
                debug!(target: "engine", remaining = n, "countdown");
                self.notify();
            }
            CountdownStep::Finished => {
                if !self.state.playback.is_playing {
                    self.start_playback();
                }
            }
        }

        self.gate.poll(now, &self.state);
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.resume.deadline(),
            self.countdown.deadline(),
            self.gate.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Write any pending debounced save now.
    pub fn flush(&mut self) {
        self.gate.flush(&self.state);
    }

    /// Write the current state now.
    pub fn save_now(&mut self) {
        self.gate.save_now(&self.state);
    }

    // ===== Stopwatch =====

    pub fn stopwatch_elapsed(&self) -> f64 {
        self.stopwatch.elapsed()
    }

    pub fn stopwatch_label(&self) -> String {
        self.stopwatch.label()
    }

    pub fn reset_stopwatch(&mut self) {
        self.stopwatch.reset();
        self.notify();
    }

    // ===== Script and panel =====

    pub fn set_script_text(&mut self, text: impl Into<String>) {
        self.state.script_text = text.into();
        self.commit(Persist::Soon);
    }

    pub fn set_panel_visible(&mut self, visible: bool) {
        self.state.panel.visible = visible;
        self.commit(Persist::Soon);
    }

    pub fn toggle_panel_visible(&mut self) {
        self.state.panel.visible = !self.state.panel.visible;
        self.commit(Persist::Soon);
    }

    pub fn set_panel_size(&mut self, width: f64, height: f64) {
        self.state.panel.width = width;
        self.state.panel.height = height;
        self.commit(Persist::Soon);
    }

    pub fn set_font_size(&mut self, font_size_px: f64) {
        self.state.panel.font_size_px = font_size_px;
        self.commit(Persist::Soon);
    }

    pub fn set_line_height(&mut self, line_height: f64) {
        self.state.panel.line_height = line_height;
        self.commit(Persist::Soon);
    }

    pub fn set_letter_spacing(&mut self, letter_spacing_px: f64) {
        self.state.panel.letter_spacing_px = letter_spacing_px;
        self.commit(Persist::Soon);
    }

    pub fn set_background_opacity(&mut self, opacity: f64) {
        self.state.panel.background_opacity = opacity;
        self.commit(Persist::Soon);
    }

    pub fn set_exclude_from_capture(&mut self, exclude: bool) {
        self.state.panel.exclude_from_capture = exclude;
        self.commit(Persist::Soon);
    }

    pub fn set_show_timer(&mut self, show: bool) {
        self.state.panel.show_timer = show;
        self.commit(Persist::Soon);
    }

    /// Move the panel by `step_px` in `direction`.
    pub fn nudge_vertical(&mut self, direction: StepDirection, step_px: f64) {
        if !step_px.is_finite() {
            return;
        }
        self.state.panel.vertical_nudge_px += direction.sign() * step_px.abs();
        self.commit(Persist::Soon);
    }

    pub fn set_vertical_position(&mut self, nudge_px: f64) {
        self.state.panel.vertical_nudge_px = nudge_px;
        self.commit(Persist::Soon);
    }

    pub fn set_editor_frame(
        &mut self,
        width: f64,
        height: f64,
        origin_x: Option<f64>,
        origin_y: Option<f64>,
    ) {
        let editor = &mut self.state.editor;
        editor.width = width;
        editor.height = height;
        editor.origin_x = origin_x;
        editor.origin_y = origin_y;
        self.commit(Persist::Soon);
    }

    pub fn set_remote_mode_enabled(&mut self, enabled: bool) {
        self.state.keyboard.remote_mode_enabled = enabled;
        self.commit(Persist::Soon);
    }

    pub fn set_consume_keys_when_remote(&mut self, consume: bool) {
        self.state.keyboard.consume_keys_when_remote = consume;
        self.commit(Persist::Soon);
    }

    /// Restore default settings, keeping the script. Written immediately.
    pub fn reset_settings_keeping_script(&mut self) {
        self.countdown.cancel();
        self.resume.cancel();
        self.state = self.state.reset_keeping_script();
        info!(target: "engine", "settings reset");
        self.commit(Persist::Now);
    }

    // ===== Recording =====

    /// Claim the recording slot for `command`. Returns false (and changes
    /// nothing) while another command is in flight.
    pub fn begin_recording_command(&mut self, command: RecordingCommand) -> bool {
        if !self.recording.begin(command) {
            debug!(target: "engine", ?command, "recording command already in flight");
            return false;
        }
        if command == RecordingCommand::StopAndSave {
            self.state.recording.status = RecordingStatus::Finalizing;
            self.state.playback.is_playing = false;
            self.resume.cancel();
            self.commit(Persist::Soon);
        }
        true
    }

    /// Apply what the pipeline reported. Results that no longer match the
    /// command in flight or the current recording status are dropped.
    /// Returns whether the result was applied.
    pub fn finish_recording_command(&mut self, outcome: RecordingOutcome) -> bool {
        if !self.recording.finish(&outcome) {
            warn!(target: "engine", command = ?outcome.command, "ignoring stale recording result");
            return false;
        }

        match outcome.result {
            Err(message) => {
                warn!(target: "engine", command = ?outcome.command, "recording failed: {message}");
                let recording = &mut self.state.recording;
                recording.status = RecordingStatus::Failed;
                recording.error_message = Some(message);
                self.state.playback.is_playing = false;
                self.resume.cancel();
                self.commit(Persist::Now);
                true
            }
            Ok(asset_id) => {
                if !outcome.command.accepts(self.state.recording.status) {
                    debug!(
                        target: "engine",
                        command = ?outcome.command,
                        status = ?self.state.recording.status,
                        "recording result no longer applies"
                    );
                    return false;
                }
                self.apply_recording_success(outcome.command, asset_id);
                true
            }
        }
    }

    fn apply_recording_success(&mut self, command: RecordingCommand, asset_id: Option<String>) {
        match command {
            RecordingCommand::Start => {
                self.countdown.cancel();
                self.resume.cancel();
                self.replay_from_top();
                let recording = &mut self.state.recording;
                recording.status = RecordingStatus::Recording;
                recording.duration_sec = 0.0;
                recording.error_message = None;
                recording.last_saved_asset_id = None;
                self.state.playback.is_playing = true;
                self.state.panel.visible = true;
                self.commit(Persist::Soon);
            }
            RecordingCommand::Pause => {
                self.resume.cancel();
                self.state.recording.status = RecordingStatus::Paused;
                self.state.recording.error_message = None;
                self.state.playback.is_playing = false;
                self.commit(Persist::Now);
            }
            RecordingCommand::Resume => {
                self.state.recording.status = RecordingStatus::Recording;
                self.state.recording.error_message = None;
                self.state.playback.is_playing = true;
                self.commit(Persist::Soon);
            }
            RecordingCommand::StopAndSave => {
                let recording = &mut self.state.recording;
                recording.status = RecordingStatus::Saved;
                recording.last_saved_asset_id = asset_id;
                recording.error_message = None;
                self.commit(Persist::Now);
            }
        }
    }

    // ===== Internals =====

    fn start_playback(&mut self) {
        self.replay_from_top();
        self.state.playback.is_playing = true;
        self.state.panel.visible = true;
        info!(target: "engine", offset = self.state.playback.offset_px, "playback started");
        self.commit(Persist::Soon);
    }

    fn stop_playback(&mut self) {
        self.resume.cancel();
        self.state.playback.is_playing = false;
        info!(target: "engine", offset = self.state.playback.offset_px, "playback paused");
        self.commit(Persist::Now);
    }

    /// Start over from the top when the script was scrolled to the end.
    fn replay_from_top(&mut self) {
        if let Some(max) = self.max_offset_px() {
            if self.state.playback.offset_px >= max {
                self.state.playback.offset_px = 0.0;
            }
        }
    }

    /// Clamp the offset to the measured ceiling and pause when there is
    /// nothing to scroll. Returns whether the state changed.
    fn enforce_bounds(&mut self) -> bool {
        let Some(max) = self.max_offset_px() else {
            return false;
        };
        let playback = &mut self.state.playback;
        let mut changed = false;
        if playback.offset_px > max {
            playback.offset_px = max;
            changed = true;
        }
        if max == 0.0 && playback.is_playing {
            playback.is_playing = false;
            changed = true;
            debug!(target: "engine", "content fits the viewport, pausing");
        }
        changed
    }

    /// Re-measure if a layout input changed since the last measurement.
    /// Returns whether the bounds were updated.
    fn refresh_measurement(&mut self) -> bool {
        let Some(measurer) = self.measurer.as_ref() else {
            return false;
        };
        let layout = TextLayout::from_state(&self.state);
        if self.measured_layout.as_ref() == Some(&layout) {
            return false;
        }
        let bounds = measurer.measure(&layout);
        debug!(target: "engine", max = bounds.max_offset_px(), "content measured");
        self.bounds = Some(bounds);
        self.measured_layout = Some(layout);
        true
    }

    /// Full commit after a user-facing mutation.
    fn commit(&mut self, persist: Persist) {
        self.state.validate(&self.limits);
        self.refresh_measurement();
        self.settle();
        match persist {
            Persist::Soon => self.gate.save_soon(self.clock.now()),
            Persist::Now => self.gate.save_now(&self.state),
        }
    }

    /// Commit without re-measuring or persisting (ticks).
    fn settle(&mut self) {
        self.state.validate(&self.limits);
        self.enforce_bounds();
        self.sync_ticker();
        self.notify();
    }

    /// Ticks run while playing or recording.
    fn sync_ticker(&mut self) {
        let wanted = self.state.playback.is_playing
            || self.state.recording.status == RecordingStatus::Recording;
        if wanted && !self.ticker.is_running() {
            self.ticker.start();
            debug!(target: "ticker", "tick source started");
        } else if !wanted && self.ticker.is_running() {
            self.ticker.stop();
            debug!(target: "ticker", "tick source stopped");
        }
        if !self.state.playback.is_playing {
            self.throttle.reset();
        }
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.state);
        }
    }
}
