//! Polling, webhook and output configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed-interval polling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Milliseconds between status fetches
    pub interval_ms: u64,
    /// Ticks allowed before the session times out
    pub max_attempts: u32,
    /// Minimum time the modal surface shows progress before a terminal result
    pub min_display_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            max_attempts: 150,
            min_display_ms: 2000,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn min_display(&self) -> Duration {
        Duration::from_millis(self.min_display_ms)
    }
}

/// Webhook mode: the upstream pushes results to `url` instead of being polled.
/// Only the request-time flag is supported; there is no inbound listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub enabled: bool,
    pub url: String,
}

/// Where downloaded videos land, relative to the note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Subfolder created next to the note
    pub folder: String,
    /// Prefix for generated file names
    pub file_prefix: String,
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            folder: "aivideo".to_string(),
            file_prefix: "sora-video".to_string(),
            extension: "mp4".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polling_defaults() {
        let config = PollingConfig::default();
        assert_eq!(config.interval(), Duration::from_millis(2000));
        assert_eq!(config.max_attempts, 150);
        assert_eq!(config.min_display(), Duration::from_secs(2));
    }

    #[test]
    fn test_polling_partial_toml() {
        let config: PollingConfig = toml::from_str("max_attempts = 3").unwrap();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.interval_ms, 2000);
    }

    #[test]
    fn test_webhook_disabled_by_default() {
        let config = WebhookConfig::default();
        assert!(!config.enabled);
        assert!(config.url.is_empty());
    }

    #[test]
    fn test_output_defaults() {
        let config = OutputConfig::default();
        assert_eq!(config.folder, "aivideo");
        assert_eq!(config.file_prefix, "sora-video");
        assert_eq!(config.extension, "mp4");
    }
}
