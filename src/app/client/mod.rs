//! Remote fetching of manifest, schema and payload text
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: the reqwest-backed [`TextFetcher`] and version-token handling

use async_trait::async_trait;

use crate::errors::FetchResult;

pub mod config;
pub mod http;

pub use config::ClientConfig;
pub use http::{versioned_url, HttpFetcher};

/// Retrieves text resources by URL
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait TextFetcher: Send + Sync {
    /// Fetch the body of `url` as text
    ///
    /// When `version` is given it is appended as a cache-busting query
    /// parameter.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Status` for non-success responses, carrying the
    /// status code and the resolved URL
    async fn fetch_text(&self, url: &str, version: Option<&str>) -> FetchResult<String>;
}
