//! Dataset load orchestration
//!
//! A load runs the network path first:
//!
//! 1. fetch and parse the manifest
//! 2. fetch and parse the schema, versioned by `schema_version`
//! 3. fetch the payload, versioned by `version`
//! 4. hash the payload and compare with `sha256` when the manifest has one
//! 5. decode the CSV and validate it against the schema
//! 6. save the validated dataset as the new last-known-good copy
//!
//! Any failure along the way abandons the network path as a whole and the
//! last-known-good copy is served instead. Only when that copy is missing
//! does the caller see an error, [`LoadError::NoDataAvailable`], carrying
//! the network failure's message.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::app::cache::LkgStore;
use crate::app::client::TextFetcher;
use crate::app::decoder::{CsvDecoder, HeaderCsvDecoder};
use crate::app::hash::Sha256Digest;
use crate::app::models::{LoadResult, Manifest, Provenance, Schema};
use crate::app::schema::validate;
use crate::constants::source::DEFAULT_SCHEMA_FILE;
use crate::errors::{FetchError, FetchResult, LoadError, LoaderResult};

/// Where the manifest and schema live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSources {
    manifest_url: Url,
    schema_url: Url,
}

fn parse_url(url: &str) -> FetchResult<Url> {
    Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        error: e.to_string(),
    })
}

impl DatasetSources {
    /// Sources with the schema next to the manifest
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the manifest URL is not absolute
    pub fn new(manifest_url: &str) -> FetchResult<Self> {
        let manifest_url = parse_url(manifest_url)?;
        let schema_url = manifest_url
            .join(DEFAULT_SCHEMA_FILE)
            .map_err(|e| FetchError::InvalidUrl {
                url: DEFAULT_SCHEMA_FILE.to_string(),
                error: e.to_string(),
            })?;
        Ok(Self {
            manifest_url,
            schema_url,
        })
    }

    /// Use an explicit schema location
    pub fn with_schema_url(mut self, schema_url: &str) -> FetchResult<Self> {
        self.schema_url = parse_url(schema_url)?;
        Ok(self)
    }

    /// Manifest location
    pub fn manifest_url(&self) -> &Url {
        &self.manifest_url
    }

    /// Schema location
    pub fn schema_url(&self) -> &Url {
        &self.schema_url
    }

    /// Payload location, resolving relative manifest URLs against the manifest
    pub fn payload_url(&self, manifest: &Manifest) -> FetchResult<Url> {
        self.manifest_url
            .join(&manifest.url)
            .map_err(|e| FetchError::InvalidUrl {
                url: manifest.url.clone(),
                error: e.to_string(),
            })
    }
}

/// Builder for [`DatasetLoader`]
pub struct LoaderBuilder {
    sources: DatasetSources,
    fetcher: Arc<dyn TextFetcher>,
    store: LkgStore,
    decoder: Option<Arc<dyn CsvDecoder>>,
}

impl LoaderBuilder {
    /// Use a specific last-known-good store (in-memory by default)
    pub fn store(mut self, store: LkgStore) -> Self {
        self.store = store;
        self
    }

    /// Supply the CSV decoding capability
    pub fn decoder(mut self, decoder: Arc<dyn CsvDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Finish building
    ///
    /// A loader without a decoder can be built; its network path fails with
    /// `LoadError::DecoderUnavailable`.
    pub fn build(self) -> DatasetLoader {
        DatasetLoader {
            sources: self.sources,
            fetcher: self.fetcher,
            store: self.store,
            decoder: self.decoder,
        }
    }
}

/// Network-first, cache-fallback dataset loader
pub struct DatasetLoader {
    sources: DatasetSources,
    fetcher: Arc<dyn TextFetcher>,
    store: LkgStore,
    decoder: Option<Arc<dyn CsvDecoder>>,
}

impl std::fmt::Debug for DatasetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetLoader")
            .field("sources", &self.sources)
            .field("store", &self.store)
            .field("has_decoder", &self.decoder.is_some())
            .finish()
    }
}

impl DatasetLoader {
    /// Loader with the default CSV decoder
    pub fn new(sources: DatasetSources, fetcher: Arc<dyn TextFetcher>, store: LkgStore) -> Self {
        Self::builder(sources, fetcher)
            .store(store)
            .decoder(Arc::new(HeaderCsvDecoder::new()))
            .build()
    }

    /// Start building a loader; no decoder is installed until one is given
    pub fn builder(sources: DatasetSources, fetcher: Arc<dyn TextFetcher>) -> LoaderBuilder {
        LoaderBuilder {
            sources,
            fetcher,
            store: LkgStore::in_memory(),
            decoder: None,
        }
    }

    /// Configured sources
    pub fn sources(&self) -> &DatasetSources {
        &self.sources
    }

    /// Last-known-good store
    pub fn store(&self) -> &LkgStore {
        &self.store
    }

    /// Load the dataset, falling back to the last-known-good copy
    ///
    /// # Errors
    ///
    /// Returns `LoadError::NoDataAvailable` when the network path fails and
    /// no cached copy exists; no other error is returned.
    pub async fn load(&self) -> LoaderResult<LoadResult> {
        let network_error = match self.load_from_network().await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        warn!(
            "Network load failed, trying last-known-good copy: {}",
            network_error
        );

        match self.store.load() {
            Some(cached) => {
                info!(
                    "Serving {} rows from last-known-good copy at {}",
                    cached.rows.len(),
                    self.store.location()
                );
                Ok(LoadResult {
                    rows: cached.rows,
                    meta: cached.meta.into_cached(),
                })
            }
            None => Err(LoadError::NoDataAvailable {
                cause: network_error.to_string(),
            }),
        }
    }

    /// Run only the network path
    ///
    /// On success the result has already been saved to the last-known-good
    /// store (save failures are logged, not returned).
    pub async fn load_from_network(&self) -> LoaderResult<LoadResult> {
        let manifest = self.fetch_manifest().await?;
        let schema = self.fetch_schema(&manifest).await?;

        let payload_url = self.sources.payload_url(&manifest)?;
        let text = self
            .fetcher
            .fetch_text(payload_url.as_str(), manifest.version.as_deref())
            .await?;

        let (text, digest) = digest_payload(text).await?;
        verify_checksum(&manifest, &digest)?;

        let decoder = self.decoder.as_ref().ok_or(LoadError::DecoderUnavailable)?;
        let rows = decoder.decode(&text)?;
        let report = validate(&rows, &schema)?;

        info!(
            "Loaded {} rows from {} (digest {})",
            report.row_count, payload_url, digest
        );

        let meta = Provenance::network(manifest);
        if let Err(e) = self.store.save(&meta, &rows) {
            warn!("Failed to update last-known-good store: {}", e);
        }

        Ok(LoadResult { rows, meta })
    }

    async fn fetch_manifest(&self) -> LoaderResult<Manifest> {
        let text = self
            .fetcher
            .fetch_text(self.sources.manifest_url.as_str(), None)
            .await?;
        let manifest: Manifest = serde_json::from_str(&text).map_err(LoadError::ManifestParse)?;
        debug!("Manifest: {:?}", manifest);
        Ok(manifest)
    }

    async fn fetch_schema(&self, manifest: &Manifest) -> LoaderResult<Schema> {
        let text = self
            .fetcher
            .fetch_text(
                self.sources.schema_url.as_str(),
                manifest.schema_version.as_deref(),
            )
            .await?;
        let schema: Schema = serde_json::from_str(&text).map_err(LoadError::SchemaParse)?;
        debug!(
            "Schema: {} required, {} numeric columns",
            schema.required_columns.len(),
            schema.numeric_columns.len()
        );
        Ok(schema)
    }
}

/// Hash the payload off the async worker threads
async fn digest_payload(text: String) -> LoaderResult<(String, Sha256Digest)> {
    tokio::task::spawn_blocking(move || {
        let digest = Sha256Digest::of_text(&text);
        (text, digest)
    })
    .await
    .map_err(|e| LoadError::DigestFailed {
        reason: e.to_string(),
    })
}

/// Compare the payload digest with the manifest, ignoring case
///
/// Manifests without a digest (or with an empty one) skip the check.
pub fn verify_checksum(manifest: &Manifest, actual: &Sha256Digest) -> LoaderResult<()> {
    let expected = match manifest.sha256.as_deref().map(str::trim) {
        Some(expected) if !expected.is_empty() => expected,
        _ => {
            debug!("Manifest has no digest; skipping checksum verification");
            return Ok(());
        }
    };

    if actual.matches_hex(expected) {
        Ok(())
    } else {
        Err(LoadError::ChecksumMismatch {
            expected: expected.to_string(),
            actual: actual.to_hex(),
        })
    }
}
