//! Process configuration for hosts embedding the directory core.
//!
//! # Responsibility
//! - Read store location and logging settings from the environment.
//! - Normalize values with the same rules `init_logging` enforces.
//!
//! # Invariants
//! - Absent variables fall back to defaults; present but malformed ones are
//!   errors, never silently ignored.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging, normalize_level, normalize_log_dir};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "DIRECTORY_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "DIRECTORY_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "DIRECTORY_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.variable, self.message)
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file; `None` selects an in-memory store.
    pub db_path: Option<PathBuf>,
    pub log_level: &'static str,
    /// Absolute log directory; `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let present = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(path) = present(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(level) = present(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|message| ConfigError {
                variable: ENV_LOG_LEVEL,
                message,
            })?;
        }
        if let Some(dir) = present(ENV_LOG_DIR) {
            config.log_dir = Some(normalize_log_dir(&dir).map_err(|message| ConfigError {
                variable: ENV_LOG_DIR,
                message,
            })?);
        }

        Ok(config)
    }

    /// Starts file logging when a directory is configured.
    pub fn init_logging(&self) -> Result<(), String> {
        match &self.log_dir {
            Some(dir) => init_logging(self.log_level, &dir.to_string_lossy()),
            None => Ok(()),
        }
    }

    /// Opens the configured store with migrations applied.
    pub fn open_store(&self) -> DbResult<Connection> {
        match &self.db_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_to_memory_store_without_file_logging() {
        let config = CoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(config.db_path.is_none());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn reads_and_normalizes_present_values() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, " /tmp/directory.db "),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_LOG_DIR, "/tmp/directory-logs"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/directory.db")));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/directory-logs")));
    }

    #[test]
    fn malformed_values_are_errors() {
        let err = CoreConfig::from_lookup(lookup_from(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert_eq!(err.variable, ENV_LOG_LEVEL);

        let err = CoreConfig::from_lookup(lookup_from(&[(ENV_LOG_DIR, "relative/logs")])).unwrap_err();
        assert_eq!(err.variable, ENV_LOG_DIR);
    }

    #[test]
    fn blank_values_count_as_absent() {
        let config = CoreConfig::from_lookup(lookup_from(&[(ENV_DB_PATH, "  ")])).unwrap();
        assert!(config.db_path.is_none());
    }
}
