//! Configuration management for LKG Loader
//!
//! Settings are layered, later layers winning:
//! 1. Default values
//! 2. Config file (explicit `--config`, else `./lkg-loader.toml`, else the
//!    user config directory)
//! 3. Environment variables
//! 4. CLI arguments

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::{CacheConfig, ClientConfig, DatasetSources};
use crate::constants::{cache, config, env, http};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Where the dataset is published
    pub source: SourceConfigToml,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Last-known-good store settings
    pub cache: CacheConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly source configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SourceConfigToml {
    /// Absolute manifest URL
    pub manifest_url: Option<String>,
    /// Absolute schema URL (defaults to `schema.json` next to the manifest)
    pub schema_url: Option<String>,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// User agent override
    pub user_agent: Option<String>,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            user_agent: None,
        }
    }
}

/// TOML-friendly cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfigToml {
    /// Cache directory path
    pub cache_root: Option<PathBuf>,
    /// Persist the last-known-good copy to disk
    pub enabled: bool,
}

impl Default for CacheConfigToml {
    fn default() -> Self {
        Self {
            cache_root: None,
            enabled: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if an explicitly given file does not
    /// exist, and read/parse errors for any file that does.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) if path.exists() => Some(path),
            Some(path) => return Err(ConfigError::NotFound { path }),
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `LKG_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(url) = non_blank(env::MANIFEST_URL) {
            debug!("{} overrides manifest URL", env::MANIFEST_URL);
            self.source.manifest_url = Some(url);
        }
        if let Some(url) = non_blank(env::SCHEMA_URL) {
            debug!("{} overrides schema URL", env::SCHEMA_URL);
            self.source.schema_url = Some(url);
        }
        if let Some(dir) = non_blank(env::CACHE_DIR) {
            debug!("{} overrides cache directory", env::CACHE_DIR);
            self.cache.cache_root = Some(PathBuf::from(dir));
        }
    }

    /// Apply command-line overrides
    pub fn apply_cli_overrides(&mut self, manifest_url: Option<String>, cache_dir: Option<PathBuf>) {
        if let Some(url) = manifest_url {
            self.source.manifest_url = Some(url);
        }
        if let Some(dir) = cache_dir {
            self.cache.cache_root = Some(dir);
        }
    }

    /// Check the settings needed to run a load
    pub fn validate(&self) -> ConfigResult<()> {
        let manifest_url =
            self.source
                .manifest_url
                .as_deref()
                .ok_or_else(|| ConfigError::MissingField {
                    field: "source.manifest_url".to_string(),
                })?;
        validate_absolute_url("source.manifest_url", manifest_url)?;

        if let Some(schema_url) = &self.source.schema_url {
            validate_absolute_url("source.schema_url", schema_url)?;
        }

        if self.client.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "client.request_timeout_secs".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be at least one second".to_string(),
            });
        }
        Ok(())
    }

    /// Resolve the dataset locations
    pub fn sources(&self) -> ConfigResult<DatasetSources> {
        self.validate()?;
        let manifest_url = self.source.manifest_url.as_deref().unwrap_or_default();

        let invalid = |field: &str, value: &str, e: crate::errors::FetchError| {
            ConfigError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                reason: e.to_string(),
            }
        };

        let sources = DatasetSources::new(manifest_url)
            .map_err(|e| invalid("source.manifest_url", manifest_url, e))?;
        match &self.source.schema_url {
            Some(schema_url) => sources
                .with_schema_url(schema_url)
                .map_err(|e| invalid("source.schema_url", schema_url, e)),
            None => Ok(sources),
        }
    }

    /// Convert TOML-friendly configuration to runtime configuration
    pub fn to_runtime_config(&self) -> (CacheConfig, ClientConfig) {
        (
            self.cache.to_runtime_config(),
            self.client.to_runtime_config(),
        )
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(config::LOCAL_CONFIG_FILE)];
        if let Some(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        match &found {
            Some(path) => debug!("Found config file: {}", path.display()),
            None => debug!("No config file found in standard locations"),
        }
        found
    }

    /// Default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(cache::APP_DIR_NAME).join(config::USER_CONFIG_FILE))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }
}

fn validate_absolute_url(field: &str, value: &str) -> ConfigResult<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: format!("Expected an absolute URL ({})", e),
        })
}

impl CacheConfigToml {
    /// Convert to runtime CacheConfig
    pub fn to_runtime_config(&self) -> CacheConfig {
        CacheConfig {
            cache_root: self.cache_root.clone(),
            enabled: self.enabled,
        }
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            system_proxy: defaults.system_proxy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.source.manifest_url, None);
        assert_eq!(config.client.request_timeout_secs, 30);
        assert_eq!(config.logging.level, "warn");
        assert!(config.cache.enabled);

        // Nothing to load from without a manifest URL
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[tokio::test]
    async fn test_config_loading_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        // Should fail when explicitly specified
        let result = AppConfig::load(Some(config_path)).await;
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_config_loading_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let test_config = r#"
[source]
manifest_url = "https://data.example.org/sets/manifest.json"

[client]
request_timeout_secs = 5

[logging]
level = "debug"
"#;
        tokio::fs::write(&config_path, test_config).await.unwrap();

        let config = AppConfig::load_from_file(&config_path).await.unwrap();
        assert_eq!(
            config.source.manifest_url.as_deref(),
            Some("https://data.example.org/sets/manifest.json")
        );
        assert_eq!(config.client.request_timeout_secs, 5);
        assert_eq!(config.logging.level, "debug");

        // Unspecified values keep their defaults
        assert_eq!(config.client.connect_timeout_secs, 10);
        assert!(config.cache.enabled);

        let sources = config.sources().unwrap();
        assert_eq!(
            sources.schema_url().as_str(),
            "https://data.example.org/sets/schema.json"
        );
    }

    #[tokio::test]
    async fn test_invalid_toml_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        tokio::fs::write(&config_path, "[source\nmanifest_url = ")
            .await
            .unwrap();

        let result = AppConfig::load_from_file(&config_path).await;
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (env::MANIFEST_URL, "https://env.example.org/manifest.json"),
            (env::SCHEMA_URL, "  "),
            (env::CACHE_DIR, "/tmp/lkg"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.source.schema_url = Some("https://file.example.org/schema.json".to_string());
        config.apply_overrides_from(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(
            config.source.manifest_url.as_deref(),
            Some("https://env.example.org/manifest.json")
        );
        // Blank values are ignored
        assert_eq!(
            config.source.schema_url.as_deref(),
            Some("https://file.example.org/schema.json")
        );
        assert_eq!(config.cache.cache_root, Some(PathBuf::from("/tmp/lkg")));
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = AppConfig::default();
        config.source.manifest_url = Some("https://file.example.org/m.json".to_string());

        config.apply_cli_overrides(
            Some("https://cli.example.org/m.json".to_string()),
            Some(PathBuf::from("/var/cache/lkg")),
        );
        assert_eq!(
            config.source.manifest_url.as_deref(),
            Some("https://cli.example.org/m.json")
        );
        assert_eq!(config.cache.cache_root, Some(PathBuf::from("/var/cache/lkg")));

        config.apply_cli_overrides(None, None);
        assert_eq!(
            config.source.manifest_url.as_deref(),
            Some("https://cli.example.org/m.json")
        );
    }

    #[test]
    fn test_validation_rejects_relative_urls() {
        let mut config = AppConfig::default();
        config.source.manifest_url = Some("manifest.json".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "source.manifest_url"
        ));

        config.source.manifest_url = Some("https://example.org/manifest.json".to_string());
        config.source.schema_url = Some("schema.json".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "source.schema_url"
        ));

        config.source.schema_url = None;
        config.client.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_runtime_conversion() {
        let mut config = AppConfig::default();
        config.client.user_agent = Some("lkg-test/1.0".to_string());
        config.cache.enabled = false;

        let (cache_config, client_config) = config.to_runtime_config();
        assert!(!cache_config.enabled);
        assert_eq!(cache_config.cache_root, None);
        assert_eq!(client_config.user_agent, "lkg-test/1.0");
        assert_eq!(client_config.request_timeout, http::DEFAULT_TIMEOUT);
    }
}
