//! Configuration module for vidnote
//!
//! Settings live in a single TOML file. Every section is `#[serde(default)]`, so a
//! partial file is merged over the defaults on load.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`VIDNOTE_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use vidnote::config::VidnoteConfig;
//!
//! let config = VidnoteConfig::default();
//! assert_eq!(config.polling.max_attempts, 150);
//!
//! let toml = r#"
//! [polling]
//! interval_ms = 500
//! "#;
//! let config: VidnoteConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.polling.interval_ms, 500);
//! assert_eq!(config.polling.max_attempts, 150);
//! ```

pub mod api;
pub mod error;
pub mod generation;
pub mod logging;
pub mod polling;
pub mod store;

pub use api::{ApiConfig, HostEndpointConfig, DEFAULT_HOST_ID, OVERSEAS_HOST_ID};
pub use error::ConfigError;
pub use generation::{default_models, GenerationConfig, ModelCatalogEntry};
pub use logging::{LogFormat, LoggingConfig};
pub use polling::{OutputConfig, PollingConfig, WebhookConfig};
pub use store::SettingsStore;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for vidnote.
///
/// Passed explicitly (usually behind an `Arc`) to every component that needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VidnoteConfig {
    /// Credentials and host catalog
    pub api: ApiConfig,
    /// Request defaults
    pub generation: GenerationConfig,
    /// Model catalog
    pub models: Vec<ModelCatalogEntry>,
    pub webhook: WebhookConfig,
    pub polling: PollingConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl Default for VidnoteConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            generation: GenerationConfig::default(),
            models: default_models(),
            webhook: WebhookConfig::default(),
            polling: PollingConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl VidnoteConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Write the full configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("VIDNOTE_API_KEY") {
            self.api.key = key;
        }
        if let Ok(host) = std::env::var("VIDNOTE_API_HOST") {
            self.api.host = host;
        }

        if let Ok(level) = std::env::var("VIDNOTE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("VIDNOTE_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(interval) = std::env::var("VIDNOTE_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.polling.interval_ms = ms;
            }
        }
        if let Ok(attempts) = std::env::var("VIDNOTE_MAX_POLL_ATTEMPTS") {
            if let Ok(n) = attempts.parse() {
                self.polling.max_attempts = n;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.polling.interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "polling.interval_ms".to_string(),
                message: "interval must be non-zero".to_string(),
            });
        }
        if self.polling.max_attempts == 0 {
            return Err(ConfigError::Validation {
                field: "polling.max_attempts".to_string(),
                message: "at least one attempt is required".to_string(),
            });
        }

        for (i, host) in self.api.hosts.iter().enumerate() {
            if host.id.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("api.hosts[{}].id", i),
                    message: "id cannot be empty".to_string(),
                });
            }
            if host.url.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("api.hosts[{}].url", i),
                    message: "URL cannot be empty".to_string(),
                });
            }
            if self.api.hosts[..i].iter().any(|h| h.id == host.id) {
                return Err(ConfigError::Validation {
                    field: format!("api.hosts[{}].id", i),
                    message: format!("duplicate host id '{}'", host.id),
                });
            }
        }

        for (i, model) in self.models.iter().enumerate() {
            if model.value.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("models[{}].value", i),
                    message: "API value cannot be empty".to_string(),
                });
            }
        }

        if self.output.folder.trim().is_empty() {
            return Err(ConfigError::MissingField("output.folder".to_string()));
        }

        Ok(())
    }

    /// Enabled models, in catalog order.
    pub fn enabled_models(&self) -> impl Iterator<Item = &ModelCatalogEntry> {
        self.models.iter().filter(|m| m.enabled)
    }
}
