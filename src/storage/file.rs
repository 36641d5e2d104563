//! File-based storage backend.
//!
//! Each key is stored as a human-readable JSON file inside a data directory
//! (`<dir>/<key>.json`). Writes go to a temporary file first and are then
//! renamed over the target, so a crash never leaves a half-written value behind.
//!
//! # Layout
//!
//! ```text
//! ~/.local/share/pindrop/
//! ├── pindrop-data.json       # { "pins": [...], "categories": [...] }
//! └── pindrop-settings.json   # { "theme": "light", ... }
//! ```

use crate::domain::error::{PindropError, Result};
use crate::storage::backend::KeyValueStore;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Extension appended to every key file.
const FILE_EXTENSION: &str = "json";

/// Directory-backed key-value store.
///
/// This type holds no cached data; every `get` reads from disk. That keeps the
/// directory as the single source of truth when it is edited by hand between
/// runs.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory containing one file per key.
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pindrop::storage::FileStore;
    ///
    /// let store = FileStore::new("/tmp/pindrop")?;
    /// # Ok::<(), pindrop::PindropError>(())
    /// ```
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tracing::debug!(path = ?dir, "initializing file storage");
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Returns the data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolves the file backing `key`.
    ///
    /// # Errors
    ///
    /// Rejects keys that are empty or would escape the data directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(PindropError::Storage(format!("invalid storage key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.{FILE_EXTENSION}")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::trace!(path = ?path, bytes = contents.len(), "read key file");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, value)?;

        tracing::trace!("renaming temporary file to final location");
        std::fs::rename(&tmp_path, &path)?;

        tracing::debug!(path = ?path, bytes = value.len(), "key saved");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_directory_and_round_trips_values() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested").join("pindrop");
        let mut store = FileStore::new(&root).unwrap();
        assert!(root.is_dir());

        assert_eq!(store.get("pindrop-data").unwrap(), None);
        store.set("pindrop-data", r#"{"pins":[]}"#).unwrap();
        assert_eq!(store.get("pindrop-data").unwrap().as_deref(), Some(r#"{"pins":[]}"#));
        assert!(root.join("pindrop-data.json").is_file());
        assert!(!root.join("pindrop-data.tmp").exists());
    }

    #[test]
    fn reopening_sees_previous_writes() {
        let dir = TempDir::new().unwrap();
        FileStore::new(dir.path()).unwrap().set("k", "v").unwrap();

        let reopened = FileStore::new(dir.path()).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn rejects_keys_escaping_the_directory() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        assert!(store.set("../outside", "x").is_err());
        assert!(store.get("a/b").is_err());
        assert!(store.get("").is_err());
        assert!(store.get(".hidden").is_err());
    }
}
