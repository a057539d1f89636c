//! File-backed store shared between processes.

use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::{ExternalChange, ExternalChangeCallback, KeyValueStore, ListenerId, StoreError};

type Records = BTreeMap<String, String>;

/// A store persisted as a single JSON object of string values.
///
/// Every read goes to disk, so values written by another process are seen
/// immediately. External-change listeners fire from [`FileStore::refresh`],
/// which compares the file against the last contents this handle saw or
/// wrote.
pub struct FileStore {
    path: PathBuf,
    snapshot: Mutex<Records>,
    listeners: Mutex<Vec<(ListenerId, String, ExternalChangeCallback)>>,
    next_listener: AtomicU64,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; parent
    /// directories are created on first write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file exists but cannot be read, or
    /// `StoreError::Format` if it is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = read_records(&path)?;
        tracing::debug!(path = %path.display(), records = snapshot.len(), "opened file store");

        Ok(Self {
            path,
            snapshot: Mutex::new(snapshot),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file and notify listeners of every record that changed
    /// since this handle last looked.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read or parsed; the
    /// snapshot is left untouched in that case.
    pub fn refresh(&self) -> Result<Vec<ExternalChange>, StoreError> {
        let current = read_records(&self.path)?;
        let changes = {
            let mut snapshot = self.snapshot();
            let keys: BTreeSet<&String> = snapshot.keys().chain(current.keys()).collect();
            let changes: Vec<ExternalChange> = keys
                .into_iter()
                .filter_map(|key| {
                    let old_value = snapshot.get(key);
                    let new_value = current.get(key);
                    (old_value != new_value).then(|| ExternalChange {
                        key: key.clone(),
                        old_value: old_value.cloned(),
                        new_value: new_value.cloned(),
                    })
                })
                .collect();
            *snapshot = current;
            changes
        };

        for change in &changes {
            let callbacks: Vec<ExternalChangeCallback> = self
                .listeners()
                .iter()
                .filter(|(_, key, _)| *key == change.key)
                .map(|(_, _, callback)| Arc::clone(callback))
                .collect();
            for callback in callbacks {
                callback(change);
            }
        }

        Ok(changes)
    }

    fn snapshot(&self) -> std::sync::MutexGuard<'_, Records> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(
        &self,
    ) -> std::sync::MutexGuard<'_, Vec<(ListenerId, String, ExternalChangeCallback)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, key: &str, value: Option<&str>) -> Result<(), StoreError> {
        let mut records = read_records(&self.path)?;
        match value {
            Some(value) => records.insert(key.to_owned(), value.to_owned()),
            None => records.remove(key),
        };
        write_records(&self.path, &records)?;

        // Own writes are not external changes.
        let mut snapshot = self.snapshot();
        match value {
            Some(value) => snapshot.insert(key.to_owned(), value.to_owned()),
            None => snapshot.remove(key),
        };
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(read_records(&self.path)?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(key, Some(value))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(key, None)
    }

    fn on_external_change(&self, key: &str, callback: ExternalChangeCallback) -> ListenerId {
        let id = ListenerId::new(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners().push((id, key.to_owned(), callback));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners().retain(|(listener, _, _)| *listener != id);
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn read_records(path: &Path) -> Result<Records, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(Records::new()),
        Ok(contents) => serde_json::from_str(&contents).map_err(StoreError::Format),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Records::new()),
        Err(e) => Err(e.into()),
    }
}

/// Write via a sibling temp file and rename so readers never see a torn file.
fn write_records(path: &Path, records: &Records) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(records).map_err(StoreError::Format)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
