//! Process startup wiring.
//!
//! # Responsibility
//! - Initialize logging and the item store once per process.
//! - Hand back a dispatcher ready to serve requests.

use crate::config::NotesConfig;
use crate::handler::RequestDispatcher;
use crate::logging::init_logging;
use crate::store::{SqliteItemStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum BootstrapError {
    Logging(String),
    Store(StoreError),
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging init failed: {message}"),
            Self::Store(err) => write!(f, "item store init failed: {err}"),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for BootstrapError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Brings up logging and the SQLite item store described by `config`.
///
/// Call once at process start and reuse the dispatcher for every request.
pub fn bootstrap(
    config: &NotesConfig,
) -> Result<RequestDispatcher<SqliteItemStore>, BootstrapError> {
    init_logging(config.log_level, &config.log_target).map_err(BootstrapError::Logging)?;

    let store = match &config.database_path {
        Some(path) => SqliteItemStore::open(path, config.table_name.as_str())?,
        None => SqliteItemStore::open_in_memory(config.table_name.as_str())?,
    };

    info!(
        "event=bootstrap module=app status=ok collection={} storage={} error_status={:?}",
        store.collection(),
        if config.database_path.is_some() {
            "file"
        } else {
            "memory"
        },
        config.error_status
    );

    Ok(RequestDispatcher::new(store).with_error_status(config.error_status))
}
