// =============================================================================
// Local Storage
// =============================================================================
//
// Small JSON documents persisted on disk: the session token and the
// locally managed supplier catalog. Each named document is one pretty
// printed file under the platform data directory, so state survives
// restarts and can be inspected or wiped by hand.
//
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Environment variable overriding the data directory.
const DATA_DIR_VAR: &str = "MOSTRADOR_DATA_DIR";

/// Persists named JSON documents under a data directory.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Open storage at the platform data directory, honoring
    /// `MOSTRADOR_DATA_DIR` when set. Creates the directory if needed.
    pub fn open_default() -> StoreResult<Self> {
        let dir = match std::env::var(DATA_DIR_VAR) {
            Ok(custom) => PathBuf::from(custom),
            Err(_) => ProjectDirs::from("com", "mostrador", "mostrador")
                .map(|dirs| dirs.data_local_dir().to_path_buf())
                .ok_or_else(|| StoreError::Storage("no data directory available".to_string()))?,
        };
        Storage::open(dir)
    }

    /// Open storage at an explicit directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(StoreError::storage)?;
        debug!(dir = %dir.display(), "Storage opened");
        Ok(Storage { dir })
    }

    /// The directory documents are stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load a named document, or `None` if it was never saved.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> StoreResult<Option<T>> {
        let path = self.path_for(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::storage(e)),
        };
        let value = serde_json::from_slice(&bytes).map_err(StoreError::storage)?;
        Ok(Some(value))
    }

    /// Save a named document, replacing any previous version.
    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> StoreResult<()> {
        let path = self.path_for(name);
        let bytes = serde_json::to_vec_pretty(value).map_err(StoreError::storage)?;
        fs::write(&path, bytes).map_err(StoreError::storage)?;
        debug!(name, "Document saved");
        Ok(())
    }

    /// Delete a named document. Deleting a document that does not exist
    /// is not an error.
    pub fn remove(&self, name: &str) -> StoreResult<()> {
        match fs::remove_file(self.path_for(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::storage(e)),
        }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        let doc = Doc {
            name: "hello".to_string(),
            count: 3,
        };
        storage.save("test-doc", &doc).unwrap();

        let loaded: Option<Doc> = storage.load("test-doc").unwrap();
        assert_eq!(loaded, Some(doc));
    }

    #[test]
    fn test_load_missing_document_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        let loaded: Option<Doc> = storage.load("never-saved").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        storage.save("doc", &Doc { name: "x".to_string(), count: 1 }).unwrap();
        storage.remove("doc").unwrap();
        storage.remove("doc").unwrap();

        let loaded: Option<Doc> = storage.load("doc").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_replaces_previous_version() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        storage.save("doc", &Doc { name: "a".to_string(), count: 1 }).unwrap();
        storage.save("doc", &Doc { name: "b".to_string(), count: 2 }).unwrap();

        let loaded: Option<Doc> = storage.load("doc").unwrap();
        assert_eq!(loaded.unwrap().name, "b");
    }
}
