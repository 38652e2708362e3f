//! Key-value storage backends
//!
//! The last-known-good store only needs string values under a couple of
//! stable keys. [`FileStore`] keeps each key in its own JSON file and
//! replaces it with the temp-file + rename pattern, so a reader sees either
//! the old value or the new one. [`MemoryStore`] backs disabled caches and
//! tests, and can be told to reject writes.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::{debug, error};

use crate::constants::cache;
use crate::errors::{CacheError, CacheResult};

/// String-valued key-value storage
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent
    fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Replace a value
    fn set(&self, key: &str, value: &str) -> CacheResult<()>;

    /// Delete a value; absent keys are not an error
    fn remove(&self, key: &str) -> CacheResult<()>;

    /// Human-readable location, for diagnostics
    fn location(&self) -> String;
}

/// One file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns `CacheError::DirectoryNotAccessible` if the directory cannot
    /// be created
    pub fn new(root: impl Into<PathBuf>) -> CacheResult<Self> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root).map_err(|e| {
                error!("Failed to create cache directory: {}", e);
                CacheError::DirectoryNotAccessible { path: root.clone() }
            })?;
            debug!("Created cache directory: {}", root.display());
        }
        Ok(Self { root })
    }

    /// Cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing a key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(key)
            .with_extension(cache::ENTRY_EXTENSION)
    }

    fn io_error(key: &str, source: std::io::Error) -> CacheError {
        CacheError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        let final_path = self.path_for(key);

        // Temp file in the same directory so the rename stays on one filesystem
        let mut temp = NamedTempFile::new_in(&self.root).map_err(|e| Self::io_error(key, e))?;
        temp.write_all(value.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| Self::io_error(key, e))?;

        temp.persist(&final_path)
            .map_err(|e| Self::io_error(key, e.error))?;

        debug!("Wrote cache entry: {}", final_path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

/// In-process storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    read_only: AtomicBool,
}

impl MemoryStore {
    /// Create an empty, writable store
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject (or accept again) all writes
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // Poisoning is ignored; entries are only ever replaced whole
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(CacheError::Disabled);
        }
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(CacheError::Disabled);
        }
        self.lock().remove(key);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
