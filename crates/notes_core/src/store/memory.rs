//! In-process item store.

use crate::model::item::{Item, ItemId};
use crate::store::{key_of, ItemStore, StoreError, StoreResult};
use crate::update::{apply_update, UpdateBindings, UpdateDirective};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Item store kept in a process-local map.
///
/// Useful as a test double and for local runs without a database file.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    items: RwLock<HashMap<ItemId, Item>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.items.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        self.len().map(|len| len == 0)
    }
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".to_string())
}

impl ItemStore for MemoryItemStore {
    fn get(&self, id: &str) -> StoreResult<Option<Item>> {
        Ok(self.items.read().map_err(poisoned)?.get(id).cloned())
    }

    fn scan(&self) -> StoreResult<Vec<Item>> {
        Ok(self
            .items
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect())
    }

    fn put(&self, item: &Item) -> StoreResult<()> {
        let id = key_of(item)?;
        self.items
            .write()
            .map_err(poisoned)?
            .insert(id.to_string(), item.clone());
        Ok(())
    }

    fn update(
        &self,
        id: &str,
        directive: &UpdateDirective,
        bindings: &UpdateBindings,
    ) -> StoreResult<Item> {
        let mut items = self.items.write().map_err(poisoned)?;
        let item = items
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        apply_update(item, directive, bindings)?;
        Ok(item.clone())
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        self.items.write().map_err(poisoned)?.remove(id);
        Ok(())
    }
}
