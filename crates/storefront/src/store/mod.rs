//! Key-value storage for persisted storefront records.
//!
//! Every record is a JSON document stored as a string value under a fixed
//! key (see [`keys`]). Managers receive a [`StoreHandle`] at construction and
//! never reach for ambient storage.
//!
//! # Implementations
//!
//! - [`MemoryStore`] - in-process origin shared by any number of contexts
//! - [`FileStore`] - a JSON file on disk, shared between processes
//!
//! # External changes
//!
//! A store notifies listeners registered with
//! [`KeyValueStore::on_external_change`] when a record is changed by a
//! *different* context than the one the listener was registered on. Writes
//! made through a handle never notify that handle's own listeners.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Keys of the persisted records.
pub mod keys {
    /// Serialized cart: array of `{product, quantity}`.
    pub const CART: &str = "ecommerce_cart";

    /// Serialized session of the signed-in user, absent when signed out.
    pub const CURRENT_USER: &str = "ecommerce_user";

    /// Serialized account directory, including credential secrets.
    pub const USERS_DB: &str = "ecommerce_users_db";
}

/// Errors raised by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The write would exceed the store's capacity.
    #[error("storage quota exceeded writing {key} (limit {limit} bytes)")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Capacity in bytes.
        limit: usize,
    },

    /// The backing file is not a JSON object of string values.
    #[error("storage file is malformed: {0}")]
    Format(#[source] serde_json::Error),

    /// A record could not be serialized.
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        /// Key being written.
        key: String,
        /// Underlying serializer error.
        #[source]
        source: serde_json::Error,
    },
}

/// A change made to a record by another context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalChange {
    /// Key of the changed record.
    pub key: String,
    /// Value before the change, if the record existed.
    pub old_value: Option<String>,
    /// Value after the change, `None` if the record was removed.
    pub new_value: Option<String>,
}

/// Identifies a registered external-change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Callback invoked with external changes to a watched key.
pub type ExternalChangeCallback = Arc<dyn Fn(&ExternalChange) + Send + Sync>;

/// Origin-scoped string key-value storage.
pub trait KeyValueStore: std::fmt::Debug + Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the value cannot be written. Nothing is
    /// changed on error.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the record under `key`. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Register `callback` for changes to `key` made by other contexts.
    fn on_external_change(&self, key: &str, callback: ExternalChangeCallback) -> ListenerId;

    /// Unregister a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

/// Shared handle to a store.
pub type StoreHandle = Arc<dyn KeyValueStore>;

/// Decode a raw record, treating an unparseable value as absent.
///
/// Corruption is logged and otherwise swallowed: callers substitute their
/// empty default.
pub fn decode_record<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding corrupt storage record");
            None
        }
    }
}

/// Read and decode a record, degrading to `None` when it is absent, corrupt,
/// or unreadable.
pub fn read_record<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match store.get(key) {
        Ok(raw) => decode_record(key, raw.as_deref()),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read storage record");
            None
        }
    }
}

/// Serialize and write a record.
///
/// # Errors
///
/// Returns `StoreError::Serialize` if the value cannot be encoded, or the
/// store's error if the write fails.
pub fn write_record<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_owned(),
        source,
    })?;
    store.set(key, &json)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_record_degrades_on_corruption() {
        assert_eq!(decode_record::<Vec<u32>>("k", Some("[1,2")), None);
        assert_eq!(decode_record::<Vec<u32>>("k", None), None);
        assert_eq!(decode_record::<Vec<u32>>("k", Some("[1,2]")), Some(vec![1, 2]));
    }

    #[test]
    fn test_write_then_read_record() {
        let store = MemoryStore::new();
        write_record(&store, "numbers", &[3, 4, 5]).unwrap();
        assert_eq!(store.get("numbers").unwrap().as_deref(), Some("[3,4,5]"));
        assert_eq!(read_record::<Vec<u32>>(&store, "numbers"), Some(vec![3, 4, 5]));
    }

    #[test]
    fn test_read_record_wrong_shape_is_absent() {
        let store = MemoryStore::new();
        store.set("numbers", "{\"not\":\"a list\"}").unwrap();
        assert_eq!(read_record::<Vec<u32>>(&store, "numbers"), None);
    }
}
