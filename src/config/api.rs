//! Upstream API configuration: credentials and host catalog

use serde::{Deserialize, Serialize};

/// Id of the built-in primary host; also the fallback selection.
pub const DEFAULT_HOST_ID: &str = "default";
/// Id of the built-in overseas host.
pub const OVERSEAS_HOST_ID: &str = "overseas";

/// One deployment of the upstream video-generation API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEndpointConfig {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl HostEndpointConfig {
    /// Built-in hosts cannot be removed from the catalog.
    pub fn is_builtin(&self) -> bool {
        self.id == DEFAULT_HOST_ID || self.id == OVERSEAS_HOST_ID
    }
}

fn default_enabled() -> bool {
    true
}

/// API credentials, host selection and request timeout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bearer token sent with every request
    pub key: String,
    /// Legacy single-URL setting, used when the selected host is missing or disabled
    pub host: String,
    /// Id of the host in `hosts` used for new submissions
    pub selected_host: String,
    /// Per-request timeout
    pub timeout_seconds: u64,
    pub hosts: Vec<HostEndpointConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            host: "https://grsai.dakka.com.cn".to_string(),
            selected_host: DEFAULT_HOST_ID.to_string(),
            timeout_seconds: 60,
            hosts: vec![
                HostEndpointConfig {
                    id: DEFAULT_HOST_ID.to_string(),
                    name: "Mainland direct".to_string(),
                    url: "https://grsai.dakka.com.cn".to_string(),
                    enabled: true,
                    description: Some("Mainland server, lowest latency".to_string()),
                },
                HostEndpointConfig {
                    id: OVERSEAS_HOST_ID.to_string(),
                    name: "Overseas".to_string(),
                    url: "https://api.grsai.com".to_string(),
                    enabled: true,
                    description: Some("Overseas server, most stable".to_string()),
                },
            ],
        }
    }
}

impl ApiConfig {
    /// The host entry matching `selected_host`, enabled or not.
    pub fn selected(&self) -> Option<&HostEndpointConfig> {
        self.hosts.iter().find(|h| h.id == self.selected_host)
    }

    pub fn host(&self, id: &str) -> Option<&HostEndpointConfig> {
        self.hosts.iter().find(|h| h.id == id)
    }

    pub fn host_mut(&mut self, id: &str) -> Option<&mut HostEndpointConfig> {
        self.hosts.iter_mut().find(|h| h.id == id)
    }
}
