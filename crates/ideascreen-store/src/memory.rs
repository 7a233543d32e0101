//! In-process document store, used when no database path is configured.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::{Document, RecordStore, StoreError};

/// Ephemeral store keeping every collection in a map guarded by a mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<BTreeMap<String, BTreeMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection` (0 if it was never written).
    pub fn count(&self, collection: &str) -> Result<usize, StoreError> {
        let guard = self.lock()?;
        Ok(guard.get(collection).map_or(0, BTreeMap::len))
    }

    /// Fetch one document by key.
    pub fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.get(collection).and_then(|c| c.get(key)).cloned())
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, BTreeMap<String, Document>>>, StoreError>
    {
        self.collections
            .lock()
            .map_err(|e| StoreError::Other(format!("mutex poisoned: {e}")))
    }
}

impl RecordStore for MemoryStore {
    fn read_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .get(collection)
            .map(|c| c.values().cloned().collect())
            .unwrap_or_default())
    }

    fn write(&self, collection: &str, key: &str, doc: &Document) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        guard
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), doc.clone());
        Ok(())
    }
}
