//! Core application logic for LKG Loader
//!
//! This module contains the load pipeline: fetching, hashing, decoding,
//! validation, the last-known-good store and the orchestrator tying them
//! together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lkg_loader::app::{AppContext, ClientConfig, DatasetLoader, DatasetSources, HttpFetcher, LkgStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sources = DatasetSources::new("https://data.example.org/manifest.json")?;
//! let fetcher = Arc::new(HttpFetcher::with_config(&ClientConfig::default())?);
//! let ctx = AppContext::new(DatasetLoader::new(sources, fetcher, LkgStore::in_memory()));
//!
//! match ctx.dataset().await {
//!     Ok(result) => println!("{} rows from {}", result.len(), result.meta.source),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod context;
pub mod decoder;
pub mod hash;
pub mod loader;
pub mod models;
pub mod schema;

// Re-export main public API
pub use cache::{CacheConfig, FileStore, KeyValueStore, LkgStore, MemoryStore};
pub use client::{ClientConfig, HttpFetcher, TextFetcher};
pub use context::AppContext;
pub use decoder::{CsvConfig, CsvDecoder, HeaderCsvDecoder};
pub use hash::{hash_text, Sha256Digest};
pub use loader::{DatasetLoader, DatasetSources, LoaderBuilder};
pub use models::{CellValue, LoadResult, Manifest, Provenance, Row, Schema, Source};
pub use schema::{validate, NumericWarning, ValidationReport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Ensure public API is accessible
        let config = ClientConfig::default();
        assert!(config.system_proxy);
        assert!(CacheConfig::default().cache_root.is_none());
    }
}
