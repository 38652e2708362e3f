//! Prelude module for LKG Loader Library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use lkg_loader::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use lkg_loader::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let sources = DatasetSources::new("https://data.example.org/manifest.json")?;
//!     let fetcher = Arc::new(HttpFetcher::with_config(&ClientConfig::default())?);
//!     let store = LkgStore::open(&CacheConfig::default())?;
//!     let ctx = AppContext::new(DatasetLoader::new(sources, fetcher, store));
//!
//!     let result = ctx.dataset().await.map_err(|e| AppError::generic(e.to_string()))?;
//!     println!("{} rows ({})", result.len(), result.meta.source);
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, LoadError, Result};

// Essential app components that are used in most integrations
pub use crate::app::{
    AppContext, CacheConfig, ClientConfig, CsvDecoder, DatasetLoader, DatasetSources,
    HeaderCsvDecoder, HttpFetcher, LkgStore, LoadResult, Provenance, Row, Source, TextFetcher,
};

// Standard library re-exports that are commonly needed
pub use std::sync::Arc;

// Common external crate re-exports for convenience
pub use tokio;
