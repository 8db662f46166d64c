//! Store configuration.
//!
//! # Responsibility
//! - Carry the backing file location into the storage gateway explicitly.
//! - Resolve the location from the process environment for binaries.

use std::path::{Path, PathBuf};

/// Environment variable consulted by [`StoreConfig::from_env`].
pub const DB_PATH_ENV: &str = "SOLARBOT_DB_PATH";
/// File used when no path is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "solarbot.sqlite3";

/// Location of the embedded panel store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    db_path: PathBuf,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Reads `SOLARBOT_DB_PATH`, falling back to `solarbot.sqlite3` in the
    /// working directory when unset or blank.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(DB_PATH_ENV).ok())
    }

    fn from_env_value(raw: Option<String>) -> Self {
        match raw {
            Some(raw) if !raw.trim().is_empty() => Self::new(raw.trim()),
            _ => Self::new(DEFAULT_DB_FILE_NAME),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreConfig, DEFAULT_DB_FILE_NAME};
    use std::path::Path;

    #[test]
    fn blank_env_value_falls_back_to_default_file() {
        let config = StoreConfig::from_env_value(Some("   ".to_string()));
        assert_eq!(config.db_path(), Path::new(DEFAULT_DB_FILE_NAME));

        let config = StoreConfig::from_env_value(None);
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn env_value_is_trimmed() {
        let config = StoreConfig::from_env_value(Some(" /var/lib/solarbot.db \n".to_string()));
        assert_eq!(config.db_path(), Path::new("/var/lib/solarbot.db"));
    }
}
