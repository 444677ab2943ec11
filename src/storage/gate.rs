//! Persistence gate: decides when the state actually reaches the store.
//!
//! Three paths:
//! - `save_soon` arms a debounce; bursts of edits collapse into one trailing
//!   write once the quiet interval passes (`poll`).
//! - `save_now` writes immediately and drops any pending debounce.
//! - `note_tick_commit` writes every Nth committed playback tick, and at once
//!   when the tick reached the end of the content.
//!
//! Every write clamps the snapshot first. Write failures are logged and
//! counted; they never reach the caller and never touch in-memory state.

use std::time::{Duration, Instant};

use tracing::{trace, warn};

use super::store::StateStore;
use crate::model::{Limits, TeleprompterState};
use crate::timing::Debounce;

pub struct PersistenceGate {
    store: Box<dyn StateStore>,
    limits: Limits,
    debounce: Debounce,
    persist_every_ticks: u32,
    ticks_since_write: u32,
    writes: usize,
    failed_writes: usize,
}

impl PersistenceGate {
    pub fn new(
        store: Box<dyn StateStore>,
        limits: Limits,
        save_debounce: Duration,
        persist_every_ticks: u32,
    ) -> Self {
        Self {
            store,
            limits,
            debounce: Debounce::new(save_debounce),
            persist_every_ticks: persist_every_ticks.max(1),
            ticks_since_write: 0,
            writes: 0,
            failed_writes: 0,
        }
    }

    /// Schedule a debounced write, replacing any pending one.
    pub fn save_soon(&mut self, now: Instant) {
        self.debounce.schedule(now);
    }

    /// Write immediately, cancelling any pending debounced write.
    pub fn save_now(&mut self, state: &TeleprompterState) {
        self.debounce.cancel();
        self.write(state);
    }

    /// Perform the debounced write if its quiet interval has passed.
    /// Returns whether a write was attempted.
    pub fn poll(&mut self, now: Instant, state: &TeleprompterState) -> bool {
        if self.debounce.fire(now) {
            self.write(state);
            true
        } else {
            false
        }
    }

    /// Write a pending debounced save right away, if there is one.
    pub fn flush(&mut self, state: &TeleprompterState) {
        if self.debounce.cancel() {
            self.write(state);
        }
    }

    /// Account for one committed playback tick.
    pub fn note_tick_commit(&mut self, reached_end: bool, state: &TeleprompterState) {
        self.ticks_since_write += 1;
        if reached_end || self.ticks_since_write >= self.persist_every_ticks {
            self.save_now(state);
        }
    }

    /// Deadline of the pending debounced write.
    pub fn deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Writes attempted so far, failed ones included.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    fn write(&mut self, state: &TeleprompterState) {
        self.ticks_since_write = 0;
        self.writes += 1;
        let snapshot = state.clone().clamped(&self.limits);
        match self.store.save(&snapshot) {
            Ok(()) => trace!(target: "state", "state persisted"),
            Err(e) => {
                self.failed_writes += 1;
                warn!(target: "state", failures = self.failed_writes, "failed to persist state: {e}");
            }
        }
    }
}
