//! Last-known-good dataset store
//!
//! Holds the rows and provenance of the most recent dataset that passed
//! validation. Only the loader writes here, and only after validation, so
//! whatever `load` returns has already been checked once.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::app::models::{LoadResult, Provenance, Row};
use crate::constants::cache::{META_KEY, ROWS_KEY};
use crate::errors::CacheResult;

use super::config::CacheConfig;
use super::store::{FileStore, KeyValueStore, MemoryStore};

/// Best-effort persistent copy of the last validated dataset
#[derive(Clone)]
pub struct LkgStore {
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for LkgStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LkgStore")
            .field("location", &self.storage.location())
            .finish()
    }
}

impl LkgStore {
    /// Wrap an existing storage backend
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Open the store described by a cache configuration
    ///
    /// A disabled cache gets an in-memory backend, so nothing outlives the
    /// process.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the cache directory cannot be resolved or
    /// created
    pub fn open(config: &CacheConfig) -> CacheResult<Self> {
        if !config.enabled {
            info!("Persistent cache disabled; using in-memory store");
            return Ok(Self::in_memory());
        }

        let store = FileStore::new(config.resolve_root()?)?;
        info!("Opened last-known-good store at {}", store.root().display());
        Ok(Self::new(Arc::new(store)))
    }

    /// Open the configured store, or an in-memory one if that fails
    ///
    /// An unusable cache directory only costs persistence; loads still run.
    pub fn open_or_memory(config: &CacheConfig) -> Self {
        match Self::open(config) {
            Ok(store) => store,
            Err(e) => {
                warn!("Cache unavailable ({}); using in-memory store", e);
                Self::in_memory()
            }
        }
    }

    /// Store with an in-memory backend
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Where entries are kept
    pub fn location(&self) -> String {
        self.storage.location()
    }

    /// Persist rows and provenance under their stable keys
    ///
    /// Both values are serialized before anything is written. The old meta
    /// is removed before the new rows land, so a failed save leaves at most
    /// an entry that `load` reads as absent. Callers are expected to log and
    /// discard failures.
    pub fn save(&self, meta: &Provenance, rows: &[Row]) -> CacheResult<()> {
        let rows_json = serde_json::to_string(rows)?;
        let meta_json = serde_json::to_string(meta)?;

        self.storage.remove(META_KEY)?;
        self.storage.set(ROWS_KEY, &rows_json)?;
        self.storage.set(META_KEY, &meta_json)?;

        debug!("Saved {} rows to last-known-good store", rows.len());
        Ok(())
    }

    /// Read the stored dataset
    ///
    /// Returns `None` if either entry is missing, unreadable, unparsable or
    /// `null`.
    pub fn load(&self) -> Option<LoadResult> {
        let rows: Vec<Row> = self.read_entry(ROWS_KEY)?;
        let meta: Provenance = self.read_entry(META_KEY)?;
        Some(LoadResult { rows, meta })
    }

    /// Remove both entries
    pub fn clear(&self) -> CacheResult<()> {
        self.storage.remove(ROWS_KEY)?;
        self.storage.remove(META_KEY)?;
        info!("Cleared last-known-good store");
        Ok(())
    }

    fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = match self.storage.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!("Cache entry {} absent", key);
                return None;
            }
            Err(e) => {
                debug!("Cache entry {} unreadable: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str::<Option<T>>(&text) {
            Ok(value) => value,
            Err(e) => {
                debug!("Cache entry {} unparsable: {}", key, e);
                None
            }
        }
    }
}
