mod json_store;
mod memory;
mod records;

#[cfg(test)]
mod tests;

use serde_json::Value;
use std::fmt;

use crate::core::error::StorageError;

pub use json_store::JsonStore;
pub use memory::MemoryStore;
pub use records::{append_record, last_client_details, read_records, replace_records};

/// Named collections in the key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Bookings,
    Sessions,
    Goals,
}

impl Collection {
    pub fn key(self) -> &'static str {
        match self {
            Self::Bookings => "bookings",
            Self::Sessions => "sessions",
            Self::Goals => "goals",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Opaque record store. Each collection is a flat list of JSON records with
/// no indexing and no transactions.
pub trait Store {
    fn append(&mut self, collection: Collection, record: Value) -> Result<(), StorageError>;

    fn read_all(&self, collection: Collection) -> Result<Vec<Value>, StorageError>;

    /// Overwrites a whole collection.
    fn replace_all(&mut self, collection: Collection, records: Vec<Value>)
        -> Result<(), StorageError>;
}
