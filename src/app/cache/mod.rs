//! Last-known-good (LKG) cache
//!
//! This module persists the most recent validated dataset so a failed
//! network load can still serve data.
//!
//! # Module Organization
//!
//! - [`config`] - Configuration types and defaults
//! - [`store`] - Key-value storage backends (file-backed and in-memory)
//! - [`lkg`] - The rows + provenance store used by the loader
//!
//! # Examples
//!
//! ```rust,no_run
//! use lkg_loader::app::cache::{CacheConfig, LkgStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = LkgStore::open(&CacheConfig::default())?;
//!
//! match store.load() {
//!     Some(cached) => println!("{} cached rows from {}", cached.len(), cached.meta.source),
//!     None => println!("No last-known-good copy"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod lkg;
pub mod store;

// Re-export main public API
pub use config::CacheConfig;
pub use lkg::LkgStore;
pub use store::{FileStore, KeyValueStore, MemoryStore};
