//! Where state files live on each platform.

use std::path::PathBuf;

use directories::BaseDirs;
use tracing::warn;

use crate::model::{LEGACY_DIR_NAME, LEGACY_FILE_NAME, STATE_DIR_NAME, STATE_FILE_NAME};

/// Per-user application data directory.
///
/// - Windows: `%APPDATA%` (roaming)
/// - macOS: `~/Library/Application Support`
/// - elsewhere: `$XDG_CONFIG_HOME`, or `~/.config`
///
/// This is also where the Electron build kept its store. Falls back to the
/// current directory when no home directory can be found.
pub fn data_dir() -> PathBuf {
    match BaseDirs::new() {
        Some(dirs) => dirs.config_dir().to_path_buf(),
        None => {
            warn!(target: "state", "no home directory, using the working directory");
            PathBuf::from(".")
        }
    }
}

/// `<data dir>/NotchyTeleprompter/state.json`
pub fn state_file_path() -> PathBuf {
    data_dir().join(STATE_DIR_NAME).join(STATE_FILE_NAME)
}

/// `<data dir>/notchy-mac-app/notchy-teleprompter.json`
pub fn legacy_file_path() -> PathBuf {
    data_dir().join(LEGACY_DIR_NAME).join(LEGACY_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_stable() {
        assert!(state_file_path().ends_with("NotchyTeleprompter/state.json"));
        assert!(legacy_file_path().ends_with("notchy-mac-app/notchy-teleprompter.json"));
    }

    #[test]
    fn state_and_legacy_share_the_platform_config_dir() {
        let base = BaseDirs::new()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        assert_eq!(data_dir(), base);
        assert!(state_file_path().starts_with(&base));
        assert!(legacy_file_path().starts_with(&base));
    }
}
