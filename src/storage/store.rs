//! Durable state stores.
//!
//! [`FileStateStore`] keeps the state as pretty JSON and replaces the file
//! atomically (write and sync `state.json.tmp`, then rename), so a crash or
//! power loss mid-write leaves either the old or the new document on disk,
//! never half of one.
//! [`MemoryStateStore`] backs tests and embedders that persist elsewhere.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::model::TeleprompterState;

/// Failure to read or write a state document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("cannot serialize state: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A place the teleprompter state is kept between sessions.
pub trait StateStore {
    /// The stored state, or `None` if nothing usable is stored.
    fn load(&self) -> Option<TeleprompterState>;

    /// Replace the stored state.
    fn save(&self, state: &TeleprompterState) -> Result<(), StoreError>;
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn load(&self) -> Option<TeleprompterState> {
        (**self).load()
    }

    fn save(&self, state: &TeleprompterState) -> Result<(), StoreError> {
        (**self).save(state)
    }
}

/// JSON file store with atomic replacement.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Read and parse the file, distinguishing "absent" from "broken".
    pub fn read(&self) -> Result<Option<TeleprompterState>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Option<TeleprompterState> {
        match self.read() {
            Ok(state) => state,
            Err(e) => {
                warn!(target: "state", "ignoring stored state: {e}");
                None
            }
        }
    }

    fn save(&self, state: &TeleprompterState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Atomic write: temp file (synced to disk) then rename
        let temp = self.temp_path();
        {
            let mut writer = BufWriter::new(File::create(&temp)?);
            serde_json::to_writer_pretty(&mut writer, state).map_err(StoreError::Serialize)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&temp, &self.path)?;

        debug!(target: "state", path = %self.path.display(), "state written");
        Ok(())
    }
}

/// In-memory store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    state: Option<TeleprompterState>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `state`.
    pub fn with_state(state: TeleprompterState) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().state = Some(state);
        store
    }

    /// Last state written (or seeded).
    pub fn stored(&self) -> Option<TeleprompterState> {
        self.inner.borrow().state.clone()
    }

    /// Number of successful saves.
    pub fn write_count(&self) -> usize {
        self.inner.borrow().writes
    }

    /// Make every following save fail with an I/O error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Option<TeleprompterState> {
        self.stored()
    }

    fn save(&self, state: &TeleprompterState) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(StoreError::Io(io::Error::other("store is read-only")));
        }
        inner.state = Some(state.clone());
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));
        assert!(store.read().unwrap().is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn save_creates_parent_directories_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("NotchyTeleprompter").join("state.json");
        let store = FileStateStore::new(&path);

        let mut state = TeleprompterState::default();
        state.playback.offset_px = 42.0;
        store.save(&state).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("NotchyTeleprompter/state.json.tmp").exists());
        assert_eq!(store.load().unwrap().playback.offset_px, 42.0);
    }

    #[test]
    fn leftover_temp_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(dir.path().join("state.json.tmp"), "{ half a docu").unwrap();

        let store = FileStateStore::new(&path);
        let mut state = TeleprompterState::default();
        state.script_text = "after crash".into();
        store.save(&state).unwrap();

        assert!(!dir.path().join("state.json.tmp").exists());
        assert_eq!(store.read().unwrap(), Some(state));
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FileStateStore::new(&path);
        assert!(matches!(store.read(), Err(StoreError::Parse { .. })));
        assert!(store.load().is_none());
    }

    #[test]
    fn memory_store_shares_slot_between_clones() {
        let store = MemoryStateStore::new();
        let handle = store.clone();
        store.save(&TeleprompterState::default()).unwrap();
        assert_eq!(handle.write_count(), 1);
        assert!(handle.stored().is_some());
    }

    #[test]
    fn memory_store_can_fail_writes() {
        let store = MemoryStateStore::new();
        store.set_fail_writes(true);
        assert!(matches!(
            store.save(&TeleprompterState::default()),
            Err(StoreError::Io(_))
        ));
        assert_eq!(store.write_count(), 0);
    }
}
