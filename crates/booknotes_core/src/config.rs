//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database path and logging settings in one place.
//!
//! # Invariants
//! - Blank variables count as unset.
//! - The log level is validated here, so `init_logging` only fails on
//!   filesystem or backend problems.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "BOOKNOTES_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "BOOKNOTES_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "BOOKNOTES_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "booknotes.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging is off when unset.
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_level = match read(LOG_LEVEL_ENV) {
            Some(raw) => normalize_level(&raw).map_err(|err| ConfigError::InvalidValue {
                key: LOG_LEVEL_ENV,
                message: err.to_string(),
            })?,
            None => default_log_level(),
        };

        let log_dir = match read(LOG_DIR_ENV).map(PathBuf::from) {
            Some(dir) if !dir.is_absolute() => {
                return Err(ConfigError::InvalidValue {
                    key: LOG_DIR_ENV,
                    message: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
            other => other,
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn resolve(pairs: &[(&str, &str)]) -> Result<CoreConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = resolve(&[(DB_PATH_ENV, "   ")]).unwrap();
        assert!(config.db_path.ends_with("booknotes.sqlite3"));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_are_used() {
        let config = resolve(&[
            (DB_PATH_ENV, "/data/books.db"),
            (LOG_LEVEL_ENV, "WARNING"),
            (LOG_DIR_ENV, "/var/log/booknotes"),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/books.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/booknotes")));
    }

    #[test]
    fn invalid_level_and_relative_log_dir_are_rejected() {
        let err = resolve(&[(LOG_LEVEL_ENV, "loud")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == LOG_LEVEL_ENV));

        let err = resolve(&[(LOG_DIR_ENV, "logs")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == LOG_DIR_ENV));
    }
}
