//! services/client/src/adapters/storage.rs
//!
//! A durable `KeyValueStorage` backed by a single JSON object on disk.
//! The file is read once when opened; every write replaces it atomically
//! (temporary file, fsync, rename).

use book_review_core::ports::{KeyValueStorage, PortError, PortResult};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

pub struct JsonFileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStorage {
    /// Opens the store at `path`. A missing or empty file is an empty store; an
    /// unreadable JSON document is discarded with a warning.
    pub fn open(path: impl Into<PathBuf>) -> PortResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("Ignoring unreadable session file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(PortError::Storage(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> PortResult<()> {
        let storage_err =
            |e: std::io::Error| PortError::Storage(format!("failed to write {}: {}", self.path.display(), e));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(storage_err)?;
            }
        }

        let contents = serde_json::to_vec_pretty(entries)
            .map_err(|e| PortError::Unexpected(format!("failed to encode session: {e}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        let mut tmp_file = File::create(&tmp_path).map_err(storage_err)?;
        tmp_file.write_all(&contents).map_err(storage_err)?;
        tmp_file.sync_all().map_err(storage_err)?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).map_err(storage_err)
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let mut entries = self.lock();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        let mut entries = self.lock();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}
