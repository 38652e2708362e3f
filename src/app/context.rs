//! Process-wide dataset handle
//!
//! [`AppContext`] owns a [`DatasetLoader`] and runs it at most once. Every
//! consumer awaiting [`AppContext::dataset`] shares the same outcome, failure
//! included. Once the load has succeeded, [`AppContext::rows`] and
//! [`AppContext::meta`] give synchronous access to the result.

use tokio::sync::OnceCell;

use crate::app::loader::DatasetLoader;
use crate::app::models::{LoadResult, Provenance, Row};
use crate::errors::{LoadError, LoaderResult};

/// Memoized load outcome shared by all consumers
#[derive(Debug)]
pub struct AppContext {
    loader: DatasetLoader,
    outcome: OnceCell<LoaderResult<LoadResult>>,
}

impl AppContext {
    /// Wrap a loader; nothing is fetched until `dataset` is awaited
    pub fn new(loader: DatasetLoader) -> Self {
        Self {
            loader,
            outcome: OnceCell::new(),
        }
    }

    /// Resolve the dataset, starting the load on first call
    ///
    /// Concurrent callers wait on the same in-flight load.
    pub async fn dataset(&self) -> Result<&LoadResult, &LoadError> {
        self.outcome
            .get_or_init(|| self.loader.load())
            .await
            .as_ref()
    }

    /// Rows of a successfully resolved load
    pub fn rows(&self) -> Option<&[Row]> {
        self.resolved().map(|result| result.rows.as_slice())
    }

    /// Provenance of a successfully resolved load
    pub fn meta(&self) -> Option<&Provenance> {
        self.resolved().map(|result| &result.meta)
    }

    /// Whether the load has finished, successfully or not
    pub fn is_resolved(&self) -> bool {
        self.outcome.initialized()
    }

    /// Loader this context resolves through
    pub fn loader(&self) -> &DatasetLoader {
        &self.loader
    }

    fn resolved(&self) -> Option<&LoadResult> {
        self.outcome.get().and_then(|outcome| outcome.as_ref().ok())
    }
}
