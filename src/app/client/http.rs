//! Single-attempt HTTP text fetching
//!
//! No retries and no backoff: a failed request fails immediately and the
//! loader decides what to do about it.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::constants::http::VERSION_QUERY_PARAM;
use crate::errors::{FetchError, FetchResult};

use super::config::ClientConfig;
use super::TextFetcher;

/// Append the cache-busting version token to a URL
///
/// Existing query parameters are kept.
///
/// # Examples
///
/// ```rust
/// use lkg_loader::app::client::versioned_url;
///
/// let url = versioned_url("https://example.org/data.csv?lang=en", Some("42")).unwrap();
/// assert_eq!(url.as_str(), "https://example.org/data.csv?lang=en&v=42");
/// ```
pub fn versioned_url(url: &str, version: Option<&str>) -> FetchResult<Url> {
    let mut parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        error: e.to_string(),
    })?;

    if let Some(version) = version {
        parsed
            .query_pairs_mut()
            .append_pair(VERSION_QUERY_PARAM, version);
    }
    Ok(parsed)
}

/// `TextFetcher` over a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher around an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a fetcher from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the client cannot be built
    pub fn with_config(config: &ClientConfig) -> FetchResult<Self> {
        Ok(Self::new(config.build_http_client()?))
    }

    /// Get a reference to the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl TextFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, version: Option<&str>) -> FetchResult<String> {
        let url = versioned_url(url, version)?;
        tracing::debug!("Fetching {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let text = response.text().await?;
        tracing::debug!("Fetched {} bytes from {}", text.len(), url);
        Ok(text)
    }
}
