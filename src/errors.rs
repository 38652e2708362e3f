//! Error types for LKG Loader
//!
//! Every stage of the load pipeline has its own error enum. All of them fold
//! into [`LoadError`] on the network path, and only
//! [`LoadError::NoDataAvailable`] is ever handed back to callers of the
//! top-level load. [`AppError`] is the binary's catch-all.

use std::path::PathBuf;
use thiserror::Error;

/// Remote fetch errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// Server answered with a non-success status
    #[error("Fetch failed: HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Transport-level failure (DNS, connect, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// URL could not be parsed or joined
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },
}

/// Schema validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No rows to validate
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Required columns absent from the first row
    #[error("Missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },
}

/// CSV decoding errors
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The payload could not be read as CSV
    #[error("Malformed CSV payload: {reason}")]
    Malformed { reason: String },
}

/// Last-known-good store errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// Underlying storage I/O failed
    #[error("Cache I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Value could not be serialized
    #[error("Failed to serialize cache entry")]
    Serialize(#[from] serde_json::Error),

    /// Store refuses writes (disabled or out of space)
    #[error("Cache storage is disabled")]
    Disabled,

    /// Cache directory missing and could not be created
    #[error("Cache directory not accessible: {path}")]
    DirectoryNotAccessible { path: PathBuf },
}

/// Errors raised while loading a dataset
#[derive(Error, Debug)]
pub enum LoadError {
    /// A fetch on the network path failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Manifest body was not valid manifest JSON
    #[error("Invalid manifest: {0}")]
    ManifestParse(#[source] serde_json::Error),

    /// Schema body was not valid schema JSON
    #[error("Invalid schema: {0}")]
    SchemaParse(#[source] serde_json::Error),

    /// Payload digest could not be computed
    #[error("Failed to compute payload digest: {reason}")]
    DigestFailed { reason: String },

    /// Payload digest did not match the manifest
    #[error("Checksum mismatch. Expected: {expected}, got: {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// No CSV decoder was supplied to the loader
    #[error("CSV decoder unavailable")]
    DecoderUnavailable,

    /// Payload could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Decoded rows failed schema validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Network path failed and no last-known-good copy exists
    #[error("No data available: network load failed ({cause}) and no cached copy exists")]
    NoDataAvailable { cause: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Missing required configuration field
    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    /// Load error
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Fetch error outside the load pipeline
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Cache error
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if retrying the command later could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Load(LoadError::NoDataAvailable { .. })
            | AppError::Fetch(FetchError::Http(_))
            | AppError::Fetch(FetchError::Status { .. }) => true,

            AppError::Config(_) | AppError::Fetch(FetchError::InvalidUrl { .. }) => false,

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Load(_) => "load",
            AppError::Fetch(_) => "fetch",
            AppError::Cache(_) => "cache",
            AppError::Config(_) => "config",
            AppError::Json(_) => "json",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Validation result type alias
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Decode result type alias
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Cache result type alias
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Loader result type alias
pub type LoaderResult<T> = std::result::Result<T, LoadError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
