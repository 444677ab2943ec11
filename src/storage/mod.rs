//! State persistence.
//!
//! - [`store`]: `StateStore` trait, atomic JSON file store, in-memory store
//! - [`gate`]: `PersistenceGate` (debounced, periodic and immediate writes)
//! - [`legacy`]: one-shot import from the old Electron store
//! - [`paths`]: per-platform file locations

pub mod gate;
pub mod legacy;
pub mod paths;
pub mod store;

pub use gate::PersistenceGate;
pub use legacy::{ElectronStoreImporter, LegacyImporter, NoLegacyImport};
pub use store::{FileStateStore, MemoryStateStore, StateStore, StoreError};

use tracing::{info, warn};

use crate::model::{Limits, RecordingStatus, TeleprompterState};

/// Build the state the process starts with.
///
/// Uses the stored state if there is one, else whatever the legacy importer
/// finds, else defaults. The result is normalised for a fresh process
/// (no recording in flight, keyboard remote off, migration marked done),
/// clamped, and written back once.
pub fn load_initial_state(
    store: &dyn StateStore,
    importer: &dyn LegacyImporter,
    limits: &Limits,
) -> TeleprompterState {
    let existing = store.load();
    let mut state = match existing {
        Some(state) => state,
        None => importer.run_if_needed(None).unwrap_or_else(|| {
            info!(target: "state", "no stored state, starting from defaults");
            TeleprompterState::default()
        }),
    };

    state.migration_completed = true;
    state.keyboard.remote_mode_enabled = false;
    if state.recording.status.is_transient() {
        state.recording.status = RecordingStatus::Idle;
    }
    state.validate(limits);

    if let Err(e) = store.save(&state) {
        warn!(target: "state", "failed to persist bootstrapped state: {e}");
    }
    state
}
