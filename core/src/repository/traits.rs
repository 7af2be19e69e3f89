use crate::error::Result;

/// Slot names shared by everything that persists through a [`KeyValueStore`].
pub mod keys {
    pub const TASKS: &str = "tasks";
    pub const FIRST_VISIT: &str = "firstVisit";
    pub const THEME: &str = "theme";
}

/// A flat string-to-string storage area. Each key is an independent slot and
/// every `set` replaces the whole value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
