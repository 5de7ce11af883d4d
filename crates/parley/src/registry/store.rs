//! Backing store for registry state.
//!
//! The registry treats persistence as an opaque whole-state load/save pair.
//! `JsonFileStore` is the production implementation; `MemoryStore` backs
//! tests that don't want to touch the filesystem.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use super::state::RegistryState;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access store at {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("store at {0} contains invalid JSON: {1}")]
    Serde(PathBuf, #[source] serde_json::Error),
}

/// Whole-state persistence for the device registry.
pub trait StateStore {
    /// Load the persisted state, or `None` if the store has never been
    /// written.
    fn load(&self) -> Result<Option<RegistryState>, StoreError>;

    /// Replace the persisted state.
    fn save(&self, state: &RegistryState) -> Result<(), StoreError>;
}

/// JSON file store, one pretty-printed document holding the whole state.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<RegistryState>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(self.path.clone(), e)),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| StoreError::Serde(self.path.clone(), e))
    }

    fn save(&self, state: &RegistryState) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(state)
            .map_err(|e| StoreError::Serde(self.path.clone(), e))?;

        std::fs::write(&self.path, contents).map_err(|e| StoreError::Io(self.path.clone(), e))
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<Option<RegistryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<RegistryState>, StoreError> {
        Ok(self.state.lock().unwrap().clone())
    }

    fn save(&self, state: &RegistryState) -> Result<(), StoreError> {
        *self.state.lock().unwrap() = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("devices.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("devices.json"));

        let mut state = RegistryState::seed();
        state.alarms.push("07:30".to_string());
        state.alarms.push("19:30".to_string());
        store.save(&state).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Serde(..))));
    }
}
