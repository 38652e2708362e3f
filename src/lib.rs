//! LKG Loader Library
//!
//! Loads a dataset described by a remote manifest, verifies the payload
//! digest, validates it against a schema and keeps a last-known-good copy
//! to serve whenever the network path fails.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(cache::ROWS_KEY, "lkg_rows");
        assert_eq!(env::MANIFEST_URL, "LKG_MANIFEST_URL");
        assert!(http::USER_AGENT.contains("LKG-Loader"));
    }

    #[test]
    fn test_error_types() {
        let load_error = errors::LoadError::DecoderUnavailable;
        let app_error = AppError::Load(load_error);

        assert_eq!(app_error.category(), "load");
        assert!(!app_error.is_recoverable());
    }
}
