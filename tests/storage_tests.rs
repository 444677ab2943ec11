//! Tests for on-disk persistence: the JSON file store, the Electron import
//! and bootstrapping a controller from disk.
#![allow(clippy::field_reassign_with_default)]

use std::fs;

use notchy::model::{Limits, RecordingStatus, DEFAULT_SCRIPT_TEXT, MAX_SPEED};
use notchy::storage::{
    load_initial_state, ElectronStoreImporter, FileStateStore, LegacyImporter, NoLegacyImport,
    StateStore, StoreError,
};
use notchy::timing::{ExternalTicks, ManualClock};
use notchy::{EngineConfig, PlaybackController, TeleprompterState};
use tempfile::TempDir;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn bootstrap(store: FileStateStore, importer: &dyn LegacyImporter) -> PlaybackController {
    PlaybackController::bootstrap(
        Box::new(store),
        importer,
        EngineConfig::default(),
        Box::new(ExternalTicks::default()),
        Box::new(ManualClock::new()),
    )
}

// === File store ===

#[test]
fn file_store_creates_parent_dirs_and_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("state.json");
    let store = FileStateStore::new(&path);

    let mut state = TeleprompterState::default();
    state.script_text = "Line one".into();
    state.playback.offset_px = 42.0;
    store.save(&state).unwrap();

    assert!(path.exists());
    assert!(!dir.path().join("nested").join("state.json.tmp").exists());
    assert_eq!(store.load(), Some(state));
}

#[test]
fn file_store_writes_camel_case_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    FileStateStore::new(&path)
        .save(&TeleprompterState::default())
        .unwrap();

    let json = fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"scriptText\""));
    assert!(json.contains("\"speedPxPerSec\""));
    assert!(json.contains("\"fontSizePx\""));
    assert!(!json.contains("script_text"));
}

#[test]
fn missing_file_reads_as_absent() {
    let dir = TempDir::new().unwrap();
    let store = FileStateStore::new(dir.path().join("state.json"));
    assert!(matches!(store.read(), Ok(None)));
    assert_eq!(store.load(), None);
}

#[test]
fn corrupt_file_is_reported_and_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "{ not json").unwrap();
    let store = FileStateStore::new(&path);

    assert!(matches!(store.read(), Err(StoreError::Parse { .. })));
    assert_eq!(store.load(), None);
}

#[test]
fn overwrite_replaces_previous_contents() {
    let dir = TempDir::new().unwrap();
    let store = FileStateStore::new(dir.path().join("state.json"));

    let mut state = TeleprompterState::default();
    state.playback.speed_px_per_sec = 30.0;
    store.save(&state).unwrap();
    state.playback.speed_px_per_sec = 90.0;
    store.save(&state).unwrap();

    let loaded = store.load().unwrap();
    assert!(approx_eq(loaded.playback.speed_px_per_sec, 90.0));
}

// === Legacy import ===

const LEGACY_JSON: &str = r#"{
    "state": {
        "scriptText": "From the old app",
        "playback": { "isPlaying": false, "speedPxPerSec": 48, "offsetPx": 120 },
        "prompterWindow": {
            "width": 420, "height": 150, "topOffsetPx": 64,
            "fontSizePx": 22, "lineHeight": 1.3, "visible": true
        },
        "editorWindow": { "width": 900, "height": 760, "x": 100, "y": 80 }
    }
}"#;

#[test]
fn electron_store_is_imported_from_disk() {
    let dir = TempDir::new().unwrap();
    let legacy_path = dir.path().join("notchy-teleprompter.json");
    fs::write(&legacy_path, LEGACY_JSON).unwrap();

    let state = ElectronStoreImporter::new(&legacy_path)
        .run_if_needed(None)
        .unwrap();
    assert_eq!(state.script_text, "From the old app");
    assert!(approx_eq(state.playback.speed_px_per_sec, 48.0));
    assert!(approx_eq(state.panel.vertical_nudge_px, 30.0));
    assert!(approx_eq(state.panel.font_size_px, 22.0));
    assert_eq!(state.editor.origin_x, Some(100.0));
    assert!(state.migration_completed);
}

#[test]
fn importer_skips_when_state_exists() {
    let dir = TempDir::new().unwrap();
    let legacy_path = dir.path().join("notchy-teleprompter.json");
    fs::write(&legacy_path, LEGACY_JSON).unwrap();

    let existing = TeleprompterState::default();
    let importer = ElectronStoreImporter::new(&legacy_path);
    assert!(importer.run_if_needed(Some(&existing)).is_none());
}

#[test]
fn unreadable_legacy_store_is_ignored() {
    let dir = TempDir::new().unwrap();
    let legacy_path = dir.path().join("notchy-teleprompter.json");
    fs::write(&legacy_path, "[]").unwrap();
    assert!(ElectronStoreImporter::new(&legacy_path)
        .run_if_needed(None)
        .is_none());

    let missing = ElectronStoreImporter::new(dir.path().join("absent.json"));
    assert!(missing.run_if_needed(None).is_none());
}

#[test]
fn empty_legacy_script_keeps_default_text() {
    let dir = TempDir::new().unwrap();
    let legacy_path = dir.path().join("notchy-teleprompter.json");
    fs::write(&legacy_path, r#"{ "state": { "scriptText": "" } }"#).unwrap();

    let state = ElectronStoreImporter::new(&legacy_path)
        .run_if_needed(None)
        .unwrap();
    assert_eq!(state.script_text, DEFAULT_SCRIPT_TEXT);
}

// === Bootstrap ===

#[test]
fn first_run_imports_legacy_and_writes_state_file() {
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("state.json");
    let legacy_path = dir.path().join("notchy-teleprompter.json");
    fs::write(&legacy_path, LEGACY_JSON).unwrap();

    let controller = bootstrap(
        FileStateStore::new(&state_path),
        &ElectronStoreImporter::new(&legacy_path),
    );
    assert_eq!(controller.state().script_text, "From the old app");

    let on_disk = FileStateStore::new(&state_path).load().unwrap();
    assert_eq!(&on_disk, controller.state());
}

#[test]
fn second_run_ignores_legacy_store() {
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("state.json");
    let legacy_path = dir.path().join("notchy-teleprompter.json");

    let mut stored = TeleprompterState::default();
    stored.script_text = "Already migrated".into();
    FileStateStore::new(&state_path).save(&stored).unwrap();
    fs::write(&legacy_path, LEGACY_JSON).unwrap();

    let controller = bootstrap(
        FileStateStore::new(&state_path),
        &ElectronStoreImporter::new(&legacy_path),
    );
    assert_eq!(controller.state().script_text, "Already migrated");
}

#[test]
fn bootstrap_normalises_hand_edited_file() {
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("state.json");
    fs::write(
        &state_path,
        r#"{
            "scriptText": "Edited",
            "playback": { "isPlaying": true, "speedPxPerSec": 9000, "offsetPx": -40 },
            "keyboard": { "remoteModeEnabled": true },
            "recording": { "status": "recording", "durationSec": 12 }
        }"#,
    )
    .unwrap();

    let controller = bootstrap(FileStateStore::new(&state_path), &NoLegacyImport);
    let state = controller.state();
    assert!(approx_eq(state.playback.speed_px_per_sec, MAX_SPEED));
    assert!(approx_eq(state.playback.offset_px, 0.0));
    assert!(!state.keyboard.remote_mode_enabled);
    assert_eq!(state.recording.status, RecordingStatus::Idle);
    assert!(state.migration_completed);

    let on_disk = FileStateStore::new(&state_path).load().unwrap();
    assert!(approx_eq(on_disk.playback.speed_px_per_sec, MAX_SPEED));
}

#[test]
fn corrupt_state_file_starts_from_defaults_and_is_replaced() {
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("state.json");
    fs::write(&state_path, "garbage").unwrap();

    let store = FileStateStore::new(&state_path);
    let state = load_initial_state(&store, &NoLegacyImport, &Limits::DESKTOP);
    assert_eq!(state.script_text, DEFAULT_SCRIPT_TEXT);
    assert!(matches!(store.read(), Ok(Some(_))));
}

#[test]
fn playback_changes_reach_disk() {
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("state.json");
    let mut controller = bootstrap(FileStateStore::new(&state_path), &NoLegacyImport);

    controller.update_scroll_bounds(1_000.0, 100.0);
    controller.toggle_playback();
    controller.handle_tick(2.0);
    controller.toggle_playback();

    let on_disk = FileStateStore::new(&state_path).load().unwrap();
    assert!(!on_disk.playback.is_playing);
    assert!(approx_eq(
        on_disk.playback.offset_px,
        2.0 * on_disk.playback.speed_px_per_sec
    ));
}
