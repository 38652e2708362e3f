//! Cache configuration types and defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::cache;
use crate::errors::{CacheError, CacheResult};

/// Configuration for the last-known-good store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Root directory for cache storage (OS-specific if None)
    pub cache_root: Option<PathBuf>,
    /// Persist entries to disk; when false nothing survives the process
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_root: None, // Will use OS-specific directory
            enabled: true,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with custom cache root
    pub fn with_cache_root(cache_root: PathBuf) -> Self {
        Self {
            cache_root: Some(cache_root),
            ..Default::default()
        }
    }

    /// Enable or disable persistence
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Directory entries are stored in
    ///
    /// Falls back to the application directory under the OS config
    /// directory:
    /// - macOS: ~/Library/Application Support/lkg-loader/cache
    /// - Linux: ~/.config/lkg-loader/cache
    /// - Windows: %APPDATA%/lkg-loader/cache
    pub fn resolve_root(&self) -> CacheResult<PathBuf> {
        match &self.cache_root {
            Some(path) => Ok(path.clone()),
            None => Ok(dirs::config_dir()
                .ok_or_else(|| CacheError::DirectoryNotAccessible {
                    path: PathBuf::from("system config directory"),
                })?
                .join(cache::APP_DIR_NAME)
                .join(cache::CACHE_DIR_NAME)),
        }
    }
}
