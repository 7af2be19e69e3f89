use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::repository::traits::KeyValueStore;

const SLOT_EXTENSION: &str = "json";

/// Keeps every slot in its own `<key>.json` file under one data directory.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let path = config.data_dir.clone();
        fs::create_dir_all(&path).map_err(|e| StoreError::io(&path, e))?;
        debug!(dir = %path.display(), "opened file store");
        Ok(FileKeyValueStore { base_dir: path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.{}", key, SLOT_EXTENSION))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    // Write to a sibling temp file and rename over the slot, so a slot is
    // either the old value or the new one.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key);
        let mut temp =
            NamedTempFile::new_in(&self.base_dir).map_err(|e| StoreError::io(&self.base_dir, e))?;
        temp.write_all(value.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| StoreError::io(temp.path(), e))?;
        temp.persist(&path)
            .map_err(|e| StoreError::io(&path, e.error))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_slot_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(&StoreConfig::new(dir.path().to_path_buf())).unwrap();

        assert_eq!(store.get("tasks").unwrap(), None);
    }

    #[test]
    fn test_set_then_get_uses_one_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(&StoreConfig::new(dir.path().to_path_buf())).unwrap();

        store.set("tasks", "[]").unwrap();
        store.set("theme", "\"dark\"").unwrap();
        store.set("tasks", "[1]").unwrap();

        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("\"dark\""));
        assert!(dir.path().join("tasks.json").exists());
        assert!(dir.path().join("theme.json").exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(&StoreConfig::new(dir.path().to_path_buf())).unwrap();

        store.set("firstVisit", "true").unwrap();
        store.remove("firstVisit").unwrap();
        store.remove("firstVisit").unwrap();

        assert_eq!(store.get("firstVisit").unwrap(), None);
    }

    #[test]
    fn test_creates_nested_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileKeyValueStore::open(&StoreConfig::new(nested.clone())).unwrap();

        store.set("tasks", "[]").unwrap();
        assert_eq!(store.base_dir(), nested.as_path());
        assert!(nested.join("tasks.json").exists());
    }
}
