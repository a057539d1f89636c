//! In-memory store with browser-storage semantics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::{ExternalChange, ExternalChangeCallback, KeyValueStore, ListenerId, StoreError};

/// An in-process store origin with any number of contexts.
///
/// [`MemoryStore::new`] creates a fresh origin and returns its first context.
/// [`MemoryStore::open_context`] returns another handle onto the same data,
/// standing in for a second open tab: writes through one context are visible
/// to all of them and notify external-change listeners registered on the
/// others.
pub struct MemoryStore {
    origin: Arc<Origin>,
    context: u64,
}

struct Origin {
    data: Mutex<HashMap<String, String>>,
    listeners: Mutex<Vec<Listener>>,
    quota: Option<usize>,
    next_context: AtomicU64,
    next_listener: AtomicU64,
}

struct Listener {
    id: ListenerId,
    context: u64,
    key: String,
    callback: ExternalChangeCallback,
}

impl MemoryStore {
    /// Create an unbounded origin.
    #[must_use]
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create an origin that holds at most `bytes` of keys plus values.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self::build(Some(bytes))
    }

    fn build(quota: Option<usize>) -> Self {
        Self {
            origin: Arc::new(Origin {
                data: Mutex::new(HashMap::new()),
                listeners: Mutex::new(Vec::new()),
                quota,
                next_context: AtomicU64::new(1),
                next_listener: AtomicU64::new(0),
            }),
            context: 0,
        }
    }

    /// Open another context onto the same origin.
    #[must_use]
    pub fn open_context(&self) -> Self {
        Self {
            origin: Arc::clone(&self.origin),
            context: self.origin.next_context.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Number of records currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.origin.data().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply a change and notify the other contexts' listeners.
    fn apply(&self, key: &str, new_value: Option<&str>) -> Result<(), StoreError> {
        let old_value = {
            let mut data = self.origin.data();

            if let (Some(limit), Some(value)) = (self.origin.quota, new_value) {
                let used: usize = data
                    .iter()
                    .filter(|(k, _)| k.as_str() != key)
                    .map(|(k, v)| k.len() + v.len())
                    .sum();
                if used + key.len() + value.len() > limit {
                    return Err(StoreError::QuotaExceeded {
                        key: key.to_owned(),
                        limit,
                    });
                }
            }

            match new_value {
                Some(value) => data.insert(key.to_owned(), value.to_owned()),
                None => data.remove(key),
            }
        };

        if old_value.as_deref() == new_value {
            return Ok(());
        }

        let change = ExternalChange {
            key: key.to_owned(),
            old_value,
            new_value: new_value.map(str::to_owned),
        };
        self.origin.notify(self.context, &change);
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Origin {
    fn data(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> std::sync::MutexGuard<'_, Vec<Listener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, writer: u64, change: &ExternalChange) {
        // Callbacks may touch the store, so none of the locks are held here.
        let callbacks: Vec<ExternalChangeCallback> = self
            .listeners()
            .iter()
            .filter(|l| l.context != writer && l.key == change.key)
            .map(|l| Arc::clone(&l.callback))
            .collect();

        for callback in callbacks {
            callback(change);
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.origin.data().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.apply(key, Some(value))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.apply(key, None)
    }

    fn on_external_change(&self, key: &str, callback: ExternalChangeCallback) -> ListenerId {
        let id = ListenerId::new(self.origin.next_listener.fetch_add(1, Ordering::Relaxed));
        self.origin.listeners().push(Listener {
            id,
            context: self.context,
            key: key.to_owned(),
            callback,
        });
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.origin.listeners().retain(|l| l.id != id);
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("context", &self.context)
            .field("records", &self.len())
            .field("quota", &self.origin.quota)
            .finish()
    }
}
