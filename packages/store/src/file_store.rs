//! # Filesystem-backed key-value store
//!
//! [`FileStore`] is the [`KeyValueStore`] used on native targets, where there is
//! no `localStorage`. Each key becomes one file under the base directory:
//!
//! ```text
//! <base_dir>/
//! ├── billwise_user      # JSON profile record
//! └── <other_key>
//! ```
//!
//! Keys are used verbatim as file names, so callers should stick to the
//! `[A-Za-z0-9_-]` keys this workspace uses. Keys containing a path separator
//! are rejected and logged.

use std::path::PathBuf;

use crate::kv::KeyValueStore;

/// Filesystem-backed KeyValueStore for native builds.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn key_path(&self, key: &str) -> Option<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            tracing::warn!(key, "rejected storage key");
            return None;
        }
        Some(self.base.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)?).ok()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(path) = self.key_path(key) else {
            return;
        };
        if let Err(e) = std::fs::create_dir_all(&self.base) {
            tracing::warn!(error = %e, dir = %self.base.display(), "failed to create storage dir");
            return;
        }
        if let Err(e) = std::fs::write(&path, value) {
            tracing::warn!(error = %e, path = %path.display(), "failed to write storage key");
        }
    }

    fn remove(&self, key: &str) {
        let Some(path) = self.key_path(key) else {
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "failed to remove storage key");
            }
        }
    }
}
