//! SQLite-backed document store.
//!
//! # Responsibility
//! - Persist items as JSON documents in the shared `items` table.
//! - Scope every statement to one collection.
//!
//! # Invariants
//! - The collection name is always a bound parameter, never SQL text.
//! - `update` reads, applies and writes inside a single transaction.
//! - Read paths reject undecodable documents instead of masking them.

use crate::db::{open_db, open_db_in_memory};
use crate::model::item::Item;
use crate::store::{key_of, ItemStore, StoreError, StoreResult};
use crate::update::{apply_update, UpdateBindings, UpdateDirective};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Document store over one SQLite connection.
pub struct SqliteItemStore {
    conn: Mutex<Connection>,
    collection: String,
}

impl SqliteItemStore {
    /// Wraps a migrated connection.
    pub fn new(conn: Connection, collection: impl Into<String>) -> Self {
        Self {
            conn: Mutex::new(conn),
            collection: collection.into(),
        }
    }

    /// Opens (or creates) a database file for `collection`.
    pub fn open(path: impl AsRef<Path>, collection: impl Into<String>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?, collection))
    }

    /// Opens a private in-memory database for `collection`.
    pub fn open_in_memory(collection: impl Into<String>) -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?, collection))
    }

    /// Name of the collection this store is scoped to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

impl ItemStore for SqliteItemStore {
    fn get(&self, id: &str) -> StoreResult<Option<Item>> {
        let conn = self.conn()?;
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM items WHERE collection = ?1 AND id = ?2;",
                params![self.collection, id],
                |row| row.get(0),
            )
            .optional()?;

        document.map(|text| decode_document(id, &text)).transpose()
    }

    fn scan(&self) -> StoreResult<Vec<Item>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, document FROM items WHERE collection = ?1 ORDER BY id;")?;
        let mut rows = stmt.query(params![self.collection])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let document: String = row.get(1)?;
            items.push(decode_document(&id, &document)?);
        }

        Ok(items)
    }

    fn put(&self, item: &Item) -> StoreResult<()> {
        let id = key_of(item)?;
        let document = encode_document(item)?;
        self.conn()?.execute(
            "INSERT INTO items (collection, id, document) VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, id) DO UPDATE SET document = excluded.document;",
            params![self.collection, id, document],
        )?;
        Ok(())
    }

    fn update(
        &self,
        id: &str,
        directive: &UpdateDirective,
        bindings: &UpdateBindings,
    ) -> StoreResult<Item> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let document: String = tx
            .query_row(
                "SELECT document FROM items WHERE collection = ?1 AND id = ?2;",
                params![self.collection, id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut item = decode_document(id, &document)?;
        apply_update(&mut item, directive, bindings)?;

        tx.execute(
            "UPDATE items SET document = ?3 WHERE collection = ?1 AND id = ?2;",
            params![self.collection, id, encode_document(&item)?],
        )?;
        tx.commit()?;

        Ok(item)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        self.conn()?.execute(
            "DELETE FROM items WHERE collection = ?1 AND id = ?2;",
            params![self.collection, id],
        )?;
        Ok(())
    }
}

fn encode_document(item: &Item) -> StoreResult<String> {
    serde_json::to_string(item)
        .map_err(|err| StoreError::InvalidData(format!("failed to encode item: {err}")))
}

fn decode_document(id: &str, text: &str) -> StoreResult<Item> {
    serde_json::from_str(text).map_err(|err| {
        StoreError::InvalidData(format!("invalid document for id `{id}` in items.document: {err}"))
    })
}
