//! Application constants for LKG Loader
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Environment variable names for configuration overrides
pub mod env {
    /// Manifest URL override
    pub const MANIFEST_URL: &str = "LKG_MANIFEST_URL";

    /// Schema URL override
    pub const SCHEMA_URL: &str = "LKG_SCHEMA_URL";

    /// Cache directory override
    pub const CACHE_DIR: &str = "LKG_CACHE_DIR";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("LKG-Loader/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Query parameter carrying the cache-busting version token
    pub const VERSION_QUERY_PARAM: &str = "v";
}

/// Remote resource layout
pub mod source {
    /// Schema file name, resolved against the manifest URL when no schema URL is configured
    pub const DEFAULT_SCHEMA_FILE: &str = "schema.json";
}

/// Schema validation limits
pub mod validation {
    /// Rows sampled per numeric column
    pub const NUMERIC_SAMPLE_ROWS: usize = 50;

    /// Characters stripped before numeric coercion
    pub const NUMERIC_STRIP_CHARS: &[char] = &['$', '%', ','];
}

/// Last-known-good store layout
pub mod cache {
    /// Storage key for serialized rows
    pub const ROWS_KEY: &str = "lkg_rows";

    /// Storage key for serialized provenance
    pub const META_KEY: &str = "lkg_meta";

    /// Extension of file-backed storage entries
    pub const ENTRY_EXTENSION: &str = "json";

    /// Application directory name under the OS config directory
    pub const APP_DIR_NAME: &str = "lkg-loader";

    /// Cache subdirectory name
    pub const CACHE_DIR_NAME: &str = "cache";
}

/// Configuration file locations
pub mod config {
    /// Project-local config file name
    pub const LOCAL_CONFIG_FILE: &str = "lkg-loader.toml";

    /// Config file name under the user config directory
    pub const USER_CONFIG_FILE: &str = "config.toml";
}

/// CLI display limits
pub mod display {
    /// Rows printed by `load` when no limit is given
    pub const DEFAULT_PREVIEW_ROWS: usize = 10;
}
