//! One-shot import of the state written by the old Electron build.
//!
//! The old store wraps everything in a `state` object and places the panel
//! by its absolute distance from the top of the screen (`topOffsetPx`). The
//! current panel is anchored under the menu bar, so offsets at or past the
//! anchor threshold are shifted up by the menu bar height; smaller values
//! were already relative and are kept.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use super::store::StoreError;
use crate::model::{TeleprompterState, LEGACY_ANCHOR_THRESHOLD_PX, LEGACY_MENU_BAR_PX};

/// Migrates state from an older on-disk format.
pub trait LegacyImporter {
    /// The imported state, or `None` when `existing` is present, no legacy
    /// data exists, or it cannot be read.
    fn run_if_needed(&self, existing: Option<&TeleprompterState>) -> Option<TeleprompterState>;
}

/// Importer that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLegacyImport;

impl LegacyImporter for NoLegacyImport {
    fn run_if_needed(&self, _existing: Option<&TeleprompterState>) -> Option<TeleprompterState> {
        None
    }
}

/// Reads `notchy-teleprompter.json` from the Electron user-data directory.
#[derive(Debug, Clone)]
pub struct ElectronStoreImporter {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct LegacyRoot {
    state: LegacyState,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacyState {
    script_text: Option<String>,
    playback: Option<LegacyPlayback>,
    prompter_window: Option<LegacyPrompterWindow>,
    editor_window: Option<LegacyEditorWindow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacyPlayback {
    is_playing: Option<bool>,
    speed_px_per_sec: Option<f64>,
    offset_px: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacyPrompterWindow {
    width: Option<f64>,
    height: Option<f64>,
    top_offset_px: Option<f64>,
    font_size_px: Option<f64>,
    line_height: Option<f64>,
    visible: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyEditorWindow {
    width: Option<f64>,
    height: Option<f64>,
    x: Option<f64>,
    y: Option<f64>,
}

impl ElectronStoreImporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<LegacyState>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let root: LegacyRoot =
            serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(root.state))
    }
}

impl LegacyImporter for ElectronStoreImporter {
    fn run_if_needed(&self, existing: Option<&TeleprompterState>) -> Option<TeleprompterState> {
        if existing.is_some() {
            return None;
        }
        match self.read() {
            Ok(Some(legacy)) => {
                info!(target: "state", path = %self.path.display(), "imported legacy state");
                Some(map_legacy_state(legacy))
            }
            Ok(None) => None,
            Err(e) => {
                warn!(target: "state", "cannot import legacy state: {e}");
                None
            }
        }
    }
}

/// Convert an absolute legacy top offset into a vertical nudge.
pub fn legacy_top_offset_to_nudge(top_offset_px: f64) -> f64 {
    if top_offset_px >= LEGACY_ANCHOR_THRESHOLD_PX {
        top_offset_px - LEGACY_MENU_BAR_PX
    } else {
        top_offset_px
    }
}

fn map_legacy_state(legacy: LegacyState) -> TeleprompterState {
    let mut state = TeleprompterState::default();

    if let Some(script) = legacy.script_text.filter(|s| !s.is_empty()) {
        state.script_text = script;
    }

    if let Some(playback) = legacy.playback {
        state.playback.is_playing = playback.is_playing.unwrap_or(false);
        if let Some(speed) = playback.speed_px_per_sec {
            state.playback.speed_px_per_sec = speed;
        }
        state.playback.offset_px = playback.offset_px.unwrap_or(0.0);
    }

    if let Some(window) = legacy.prompter_window {
        let panel = &mut state.panel;
        panel.width = window.width.unwrap_or(panel.width);
        panel.height = window.height.unwrap_or(panel.height);
        panel.font_size_px = window.font_size_px.unwrap_or(panel.font_size_px);
        panel.line_height = window.line_height.unwrap_or(panel.line_height);
        panel.visible = window.visible.unwrap_or(panel.visible);
        panel.vertical_nudge_px =
            legacy_top_offset_to_nudge(window.top_offset_px.unwrap_or(LEGACY_MENU_BAR_PX));
    }

    if let Some(editor) = legacy.editor_window {
        state.editor.width = editor.width.unwrap_or(state.editor.width);
        state.editor.height = editor.height.unwrap_or(state.editor.height);
        state.editor.origin_x = editor.x;
        state.editor.origin_y = editor.y;
    }

    state.migration_completed = true;
    state
}
