use serde_json::Value;
use std::collections::HashMap;

use super::{Collection, Store};
use crate::core::error::StorageError;

/// In-process store. Never fails.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: HashMap<Collection, Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.collections.get(&collection).map_or(0, Vec::len)
    }
}

impl Store for MemoryStore {
    fn append(&mut self, collection: Collection, record: Value) -> Result<(), StorageError> {
        self.collections.entry(collection).or_default().push(record);
        Ok(())
    }

    fn read_all(&self, collection: Collection) -> Result<Vec<Value>, StorageError> {
        Ok(self.collections.get(&collection).cloned().unwrap_or_default())
    }

    fn replace_all(
        &mut self,
        collection: Collection,
        records: Vec<Value>,
    ) -> Result<(), StorageError> {
        self.collections.insert(collection, records);
        Ok(())
    }
}
