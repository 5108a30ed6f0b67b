use crate::errors::StorageError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::{env, process};
use tracing::debug;

pub const DATA_DIR_ENV: &str = "TRACKLIFE_DATA_DIR";

/// Flat key-value namespace the trackers persist into.
///
/// `get` returns `Ok(None)` for a slot that was never written.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

pub fn resolve_data_dir() -> PathBuf {
    if let Ok(path) = env::var(DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    PathBuf::from("data")
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes bytes as-is, bypassing any encoding. Used to plant fixtures.
    pub fn insert_raw(&self, key: &str, value: impl Into<Vec<u8>>) -> Result<(), StorageError> {
        self.set(key, &value.into())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| StorageError::Poisoned(key.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| StorageError::Poisoned(key.to_string()))?;
        slots.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// One JSON file per slot under `root`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "opened file store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key.replace(':', "_")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.slot_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.slot_path(key);
        let tmp = path.with_extension(format!("json.{}.tmp", process::id()));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_returns_none_for_unwritten_slot() {
        let store = MemoryStore::new();
        assert!(store.get("tracklife:sleep").unwrap().is_none());

        store.set("tracklife:sleep", b"[]").unwrap();
        assert_eq!(store.get("tracklife:sleep").unwrap().as_deref(), Some(&b"[]"[..]));
    }

    #[test]
    fn file_store_maps_namespaced_keys_to_file_names() {
        let store = FileStore {
            root: PathBuf::from("/tmp/tracklife"),
        };
        assert_eq!(
            store.slot_path("tracklife:budget:categories"),
            PathBuf::from("/tmp/tracklife/tracklife_budget_categories.json")
        );
    }
}
