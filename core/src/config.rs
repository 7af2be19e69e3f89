use std::path::PathBuf;

use crate::error::{Result, StoreError};

/// Environment variable naming the data directory. The CLI reads it once as
/// the fallback for `--data-dir`.
pub const DATA_DIR_ENV: &str = "TASKMASTER_HOME";
const DEFAULT_DIR_NAME: &str = ".taskmaster";

/// Where the storage slots live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// `~/.taskmaster`
    pub fn from_home() -> Result<Self> {
        let home_dir = dirs::home_dir().ok_or(StoreError::HomeDirNotFound)?;
        Ok(Self::new(home_dir.join(DEFAULT_DIR_NAME)))
    }

    /// The given directory, or the home directory default when none was
    /// given. An empty path counts as none.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        match explicit.filter(|d| !d.as_os_str().is_empty()) {
            Some(dir) => Ok(Self::new(dir)),
            None => Self::from_home(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        let config = StoreConfig::resolve(Some(PathBuf::from("/tmp/tm-explicit"))).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/tm-explicit"));
    }

    #[test]
    fn test_missing_or_empty_dir_falls_back_to_home() {
        if let Ok(home) = StoreConfig::from_home() {
            assert_eq!(StoreConfig::resolve(None).unwrap(), home);
            assert_eq!(StoreConfig::resolve(Some(PathBuf::new())).unwrap(), home);
        }
    }

    #[test]
    fn test_home_default_ends_with_dir_name() {
        if let Ok(config) = StoreConfig::from_home() {
            assert!(config.data_dir.ends_with(DEFAULT_DIR_NAME));
        }
    }
}
