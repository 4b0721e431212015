//! Generation defaults and the model catalog

use serde::{Deserialize, Serialize};

/// One selectable video model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalogEntry {
    pub id: String,
    /// Display name
    pub name: String,
    /// Value sent as the request's `model` field
    pub value: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User-added entry (as opposed to shipped with the defaults)
    #[serde(default)]
    pub custom: bool,
}

fn default_true() -> bool {
    true
}

/// Request defaults applied when the caller doesn't specify a value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub default_model: String,
    pub default_aspect_ratio: String,
    pub default_duration: u32,
    pub default_size: String,
    pub aspect_ratios: Vec<String>,
    pub durations: Vec<u32>,
    pub sizes: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_model: "sora-2".to_string(),
            default_aspect_ratio: "16:9".to_string(),
            default_duration: 10,
            default_size: "small".to_string(),
            aspect_ratios: ["16:9", "9:16", "1:1", "4:3", "3:4"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            durations: vec![5, 10, 15, 30, 60],
            sizes: ["small", "medium", "large"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Models shipped with a fresh configuration.
pub fn default_models() -> Vec<ModelCatalogEntry> {
    [
        ("sora-2", "Sora 2.0", "Latest OpenAI video model"),
        ("sora-1.5", "Sora 1.5", "OpenAI video model"),
        ("runway-gen3", "Runway Gen-3", "Runway video model"),
    ]
    .into_iter()
    .map(|(value, name, description)| ModelCatalogEntry {
        id: value.to_string(),
        name: name.to_string(),
        value: value.to_string(),
        enabled: true,
        description: Some(description.to_string()),
        custom: false,
    })
    .collect()
}
