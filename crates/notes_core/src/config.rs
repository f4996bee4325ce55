//! Runtime configuration read from the process environment.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Invalid values fail loudly instead of falling back to defaults.

use crate::logging::{default_log_level, normalize_level, LogTarget};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Collection name when `TABLE_NAME` is unset.
pub const DEFAULT_TABLE_NAME: &str = "Notes";

pub const TABLE_NAME_VAR: &str = "TABLE_NAME";
pub const DB_PATH_VAR: &str = "NOTES_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "NOTES_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "NOTES_LOG_DIR";
pub const ERROR_STATUS_VAR: &str = "NOTES_ERROR_STATUS";

/// How failed requests map to HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStatusPolicy {
    /// 400 for caller errors, 404 not found, 405 bad method, 502 store failure.
    #[default]
    Differentiated,
    /// Every failure is 400.
    Uniform,
}

impl ErrorStatusPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "differentiated" => Some(Self::Differentiated),
            "uniform" => Some(Self::Uniform),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        variable: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                variable,
                value,
                reason,
            } => write!(f, "invalid {variable}=`{value}`: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Settings needed to bring up the request handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesConfig {
    /// Backing collection name.
    pub table_name: String,
    /// SQLite file; `None` keeps the store in memory.
    pub database_path: Option<PathBuf>,
    pub log_level: &'static str,
    pub log_target: LogTarget,
    pub error_status: ErrorStatusPolicy,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            database_path: None,
            log_level: default_log_level(),
            log_target: LogTarget::Stderr,
            error_status: ErrorStatusPolicy::default(),
        }
    }
}

impl NotesConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let log_level = match read(LOG_LEVEL_VAR) {
            Some(value) => normalize_level(&value).map_err(|reason| ConfigError::InvalidValue {
                variable: LOG_LEVEL_VAR,
                value,
                reason,
            })?,
            None => defaults.log_level,
        };

        let log_dir = read(LOG_DIR_VAR);
        let log_target = LogTarget::from_dir_setting(log_dir.as_deref()).map_err(|reason| {
            ConfigError::InvalidValue {
                variable: LOG_DIR_VAR,
                value: log_dir.clone().unwrap_or_default(),
                reason,
            }
        })?;

        let error_status = match read(ERROR_STATUS_VAR) {
            Some(value) => {
                ErrorStatusPolicy::parse(&value).ok_or_else(|| ConfigError::InvalidValue {
                    variable: ERROR_STATUS_VAR,
                    value,
                    reason: "expected differentiated|uniform".to_string(),
                })?
            }
            None => defaults.error_status,
        };

        Ok(Self {
            table_name: read(TABLE_NAME_VAR).unwrap_or(defaults.table_name),
            database_path: read(DB_PATH_VAR).map(PathBuf::from),
            log_level,
            log_target,
            error_status,
        })
    }
}
