//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank environment values count as unset.
//! - File logging is enabled only when a log directory is configured.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "NOTICEBOARD_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "NOTICEBOARD_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "NOTICEBOARD_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "noticeboard.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeboardConfig {
    /// Document store database file.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl NoticeboardConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NoticeboardConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let env = HashMap::from([(LOG_LEVEL_ENV, "   ")]);
        let config = NoticeboardConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert!(config.db_path.ends_with("noticeboard.sqlite3"));
        assert_eq!(config.log_level, crate::default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn environment_values_override_defaults() {
        let env = HashMap::from([
            (DB_PATH_ENV, "/var/lib/noticeboard/board.db"),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, " /var/log/noticeboard "),
        ]);
        let config = NoticeboardConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.db_path, PathBuf::from("/var/lib/noticeboard/board.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/noticeboard")));
    }
}
