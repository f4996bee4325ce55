//! Item store adapters.
//!
//! # Responsibility
//! - Define the narrow persistence contract the request handler depends on.
//! - Provide in-memory and SQLite document implementations.
//!
//! # Invariants
//! - `update` touches only the attributes named by the directive and returns
//!   the full post-update item.
//! - `delete` is idempotent; a missing id is not an error.
//! - Store APIs return semantic errors (`NotFound`) in addition to backend
//!   transport errors.

use crate::db::DbError;
use crate::model::item::{item_id, Item, ItemId, ID_ATTRIBUTE};
use crate::update::{ApplyError, UpdateBindings, UpdateDirective};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryItemStore;
pub use sqlite::SqliteItemStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for item persistence operations.
#[derive(Debug)]
pub enum StoreError {
    /// No item exists under the requested id.
    NotFound(ItemId),
    /// The directive could not be applied to the stored item.
    InvalidUpdate(ApplyError),
    /// Stored data could not be decoded back into an item.
    InvalidData(String),
    /// SQLite transport or schema failure.
    Db(DbError),
    /// The backend cannot serve requests right now.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidUpdate(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid stored item data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "item store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidUpdate(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

/// Extracts the key of an item about to be written.
pub(crate) fn key_of(item: &Item) -> StoreResult<&str> {
    item_id(item).ok_or_else(|| {
        StoreError::InvalidData(format!("item is missing string attribute `{ID_ATTRIBUTE}`"))
    })
}

impl From<ApplyError> for StoreError {
    fn from(value: ApplyError) -> Self {
        Self::InvalidUpdate(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for one collection of items.
pub trait ItemStore {
    /// Gets one item by id; `Ok(None)` when absent.
    fn get(&self, id: &str) -> StoreResult<Option<Item>>;
    /// Returns every item in the collection, order unspecified.
    fn scan(&self) -> StoreResult<Vec<Item>>;
    /// Unconditionally inserts or replaces the item keyed by its `id`.
    fn put(&self, item: &Item) -> StoreResult<()>;
    /// Applies `directive` to an existing item and returns the result.
    fn update(
        &self,
        id: &str,
        directive: &UpdateDirective,
        bindings: &UpdateBindings,
    ) -> StoreResult<Item>;
    /// Removes the item keyed by `id` if present.
    fn delete(&self, id: &str) -> StoreResult<()>;
}
