use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{Collection, Store};
use crate::core::config::AppConfig;
use crate::core::error::StorageError;

/// File-backed store: one JSON array per collection, rewritten in full on
/// every change.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn open(config: &AppConfig) -> Result<Self, StorageError> {
        Self::open_at(config.data_path())
    }

    pub fn open_at(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(Self { dir })
    }

    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.key()))
    }

    fn load(&self, collection: Collection) -> Result<Vec<Value>, StorageError> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| StorageError::Io(e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str(&content) {
            Ok(Value::Array(records)) => Ok(records),
            Ok(_) => Err(StorageError::Serialization(format!(
                "{} is not a JSON array",
                path.display()
            ))),
            Err(e) => Err(StorageError::Serialization(format!("{}: {e}", path.display()))),
        }
    }

    fn write(&self, collection: Collection, records: &[Value]) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        std::fs::write(self.collection_path(collection), content)
            .map_err(|e| StorageError::Io(e.to_string()))?;
        debug!(%collection, records = records.len(), "collection written");
        Ok(())
    }
}

impl Store for JsonStore {
    fn append(&mut self, collection: Collection, record: Value) -> Result<(), StorageError> {
        let mut records = self.load(collection)?;
        records.push(record);
        self.write(collection, &records)
    }

    fn read_all(&self, collection: Collection) -> Result<Vec<Value>, StorageError> {
        self.load(collection)
    }

    fn replace_all(
        &mut self,
        collection: Collection,
        records: Vec<Value>,
    ) -> Result<(), StorageError> {
        self.write(collection, &records)
    }
}
