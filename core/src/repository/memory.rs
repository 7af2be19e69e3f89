use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::error::{Result, StoreError};
use crate::repository::traits::KeyValueStore;

/// Process-local storage. Handy for tests and for running without a data
/// directory.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    slots: RefCell<HashMap<String, String>>,
    read_only: Cell<bool>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots<I, K, V>(slots: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            slots: RefCell::new(
                slots
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            read_only: Cell::new(false),
        }
    }

    /// Makes every subsequent write fail, to exercise rollback paths.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        if self.read_only.get() {
            return Err(StoreError::Unavailable(format!("slot '{}' is read-only", key)));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable(key)?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable(key)?;
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}
