//! Filesystem layout under the Tandem root directory.
//!
//! ```text
//! ~/.tandem/                     (or $TANDEM_HOME_DIR)
//! ├── logs/
//! ├── settings.json
//! ├── access.key
//! ├── daemon.state.json
//! └── daemon.state.json.lock
//! ```
//!
//! Only the root and `logs/` are created here; the files are path
//! computations for other subsystems.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::env::{EnvSnapshot, HOME_DIR_VAR};
use crate::error::{Error, Result};

/// Root directory name under the user's home when no override is set.
pub const DEFAULT_HOME_SUBDIR: &str = ".tandem";

const LOGS_DIR: &str = "logs";
const SETTINGS_FILE: &str = "settings.json";
const PRIVATE_KEY_FILE: &str = "access.key";
const DAEMON_STATE_FILE: &str = "daemon.state.json";
const DAEMON_LOCK_FILE: &str = "daemon.state.json.lock";

/// All paths derived from a single root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeLayout {
    pub home_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub settings_file: PathBuf,
    pub private_key_file: PathBuf,
    pub daemon_state_file: PathBuf,
    pub daemon_lock_file: PathBuf,
}

impl HomeLayout {
    /// Derive every path from `root`.
    pub fn new(root: PathBuf) -> Self {
        Self {
            logs_dir: root.join(LOGS_DIR),
            settings_file: root.join(SETTINGS_FILE),
            private_key_file: root.join(PRIVATE_KEY_FILE),
            daemon_state_file: root.join(DAEMON_STATE_FILE),
            daemon_lock_file: root.join(DAEMON_LOCK_FILE),
            home_dir: root,
        }
    }

    /// Pick the root from `TANDEM_HOME_DIR` or `<user_home>/.tandem`.
    ///
    /// `user_home` is only required when it is actually needed: for the
    /// default root, or to expand a `~` in the override.
    pub fn resolve(env: &EnvSnapshot, user_home: Option<&Path>) -> Result<Self> {
        let root = match env.get(HOME_DIR_VAR) {
            Some(raw) if raw.starts_with('~') => {
                let home = user_home.ok_or(Error::HomeDirUnavailable)?;
                expand_tilde(raw, home)
            }
            Some(raw) => PathBuf::from(raw),
            None => user_home
                .ok_or(Error::HomeDirUnavailable)?
                .join(DEFAULT_HOME_SUBDIR),
        };
        Ok(Self::new(root))
    }

    /// Create the root and `logs/` directories if they are missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.home_dir, &self.logs_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }
}

/// Expand a leading `~` (alone or followed by a separator) to `user_home`.
///
/// `~user` forms are left as-is.
pub fn expand_tilde(raw: &str, user_home: &Path) -> PathBuf {
    match raw.strip_prefix('~') {
        Some("") => user_home.to_path_buf(),
        Some(rest) if rest.starts_with('/') || rest.starts_with(std::path::MAIN_SEPARATOR) => {
            user_home.join(rest.trim_start_matches(['/', std::path::MAIN_SEPARATOR]))
        }
        _ => PathBuf::from(raw),
    }
}
