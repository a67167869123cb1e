//! Runtime configuration from process environment.
//!
//! # Responsibility
//! - Resolve store path and logging settings for binaries embedding core.
//!
//! # Invariants
//! - A returned `CoreConfig` always carries a normalized log level.
//! - `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "MOLECULE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "MOLECULE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "MOLECULE_LOG_DIR";

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
    /// SQLite issue store file; seeding is skipped when unset.
    pub db_path: Option<PathBuf>,
    pub log_level: &'static str,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads `MOLECULE_DB_PATH`, `MOLECULE_LOG_LEVEL` and `MOLECULE_LOG_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(value) => normalize_level(&value).map_err(|message| ConfigError {
                variable: ENV_LOG_LEVEL,
                message,
            })?,
            None => default_log_level(),
        };

        let log_dir = read(ENV_LOG_DIR)
            .map(|value| normalize_log_dir(&value))
            .transpose()
            .map_err(|message| ConfigError {
                variable: ENV_LOG_DIR,
                message,
            })?;

        Ok(Self {
            db_path: read(ENV_DB_PATH).map(|value| PathBuf::from(value.trim())),
            log_level,
            log_dir,
        })
    }
}
