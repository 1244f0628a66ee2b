use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::{Collection, Store};
use crate::core::booking::{Booking, ClientDetails};
use crate::core::error::StorageError;

pub fn append_record<T: Serialize>(
    store: &mut dyn Store,
    collection: Collection,
    record: &T,
) -> Result<(), StorageError> {
    let value =
        serde_json::to_value(record).map_err(|e| StorageError::Serialization(e.to_string()))?;
    store.append(collection, value)
}

/// Reads a collection as `T`. Records that do not deserialize are skipped
/// and logged, since other writers may share the store.
pub fn read_records<T: DeserializeOwned>(
    store: &dyn Store,
    collection: Collection,
) -> Result<Vec<T>, StorageError> {
    let values = store.read_all(collection)?;
    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value(value) {
            Ok(record) => records.push(record),
            Err(e) => warn!(%collection, index, error = %e, "skipping malformed record"),
        }
    }
    Ok(records)
}

pub fn replace_records<T: Serialize>(
    store: &mut dyn Store,
    collection: Collection,
    records: &[T],
) -> Result<(), StorageError> {
    let values = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    store.replace_all(collection, values)
}

/// Client details of the most recent booking, used to prefill the contact
/// step of a new wizard.
pub fn last_client_details(store: &dyn Store) -> Result<Option<ClientDetails>, StorageError> {
    let bookings: Vec<Booking> = read_records(store, Collection::Bookings)?;
    Ok(bookings
        .into_iter()
        .max_by_key(|b| b.created_at)
        .map(|b| b.client_details))
}
