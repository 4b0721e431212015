//! Persisted settings store.
//!
//! Loads the TOML file once (merged over defaults), hands out the current value,
//! and writes the whole file back after every successful mutation.

use super::{ConfigError, HostEndpointConfig, ModelCatalogEntry, VidnoteConfig, DEFAULT_HOST_ID};
use std::path::{Path, PathBuf};

/// Owns the configuration file and its in-memory value.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    config: VidnoteConfig,
}

impl SettingsStore {
    /// Open the store at `path`; a missing file yields the defaults.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = if path.exists() {
            VidnoteConfig::load(Some(&path))?
        } else {
            tracing::debug!(path = %path.display(), "Settings file not found, using defaults");
            VidnoteConfig::default()
        };
        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &VidnoteConfig {
        &self.config
    }

    /// Apply `f` to a copy of the configuration, validate it, persist it, and only
    /// then make it current. A failed mutation leaves both memory and disk untouched.
    pub fn update<T, F>(&mut self, f: F) -> Result<T, ConfigError>
    where
        F: FnOnce(&mut VidnoteConfig) -> Result<T, ConfigError>,
    {
        let mut next = self.config.clone();
        let value = f(&mut next)?;
        next.validate()?;
        next.save(&self.path)?;
        self.config = next;
        Ok(value)
    }

    pub fn set_api_key(&mut self, key: &str) -> Result<(), ConfigError> {
        let key = key.trim().to_string();
        self.update(|c| {
            c.api.key = key;
            Ok(())
        })
    }

    /// Add a user host. The URL must parse and must not already be in the catalog.
    pub fn add_host(
        &mut self,
        name: &str,
        url: &str,
        description: Option<&str>,
    ) -> Result<HostEndpointConfig, ConfigError> {
        let name = name.trim();
        let url = url.trim();
        if name.is_empty() {
            return Err(ConfigError::MissingField("name".to_string()));
        }
        if url.is_empty() {
            return Err(ConfigError::MissingField("url".to_string()));
        }
        reqwest::Url::parse(url).map_err(|e| ConfigError::Validation {
            field: "url".to_string(),
            message: e.to_string(),
        })?;

        self.update(|c| {
            if c.api.hosts.iter().any(|h| h.url == url) {
                return Err(ConfigError::DuplicateHostUrl(url.to_string()));
            }
            let host = HostEndpointConfig {
                id: unique_custom_id(c.api.hosts.iter().map(|h| h.id.as_str())),
                name: name.to_string(),
                url: url.to_string(),
                enabled: true,
                description: non_blank(description),
            };
            c.api.hosts.push(host.clone());
            Ok(host)
        })
    }

    /// Remove a user host. Removing the selected host reselects the default host.
    pub fn remove_host(&mut self, id: &str) -> Result<HostEndpointConfig, ConfigError> {
        self.update(|c| {
            let index = c
                .api
                .hosts
                .iter()
                .position(|h| h.id == id)
                .ok_or_else(|| ConfigError::UnknownHost(id.to_string()))?;
            if c.api.hosts[index].is_builtin() {
                return Err(ConfigError::ProtectedHost(id.to_string()));
            }
            let removed = c.api.hosts.remove(index);
            if c.api.selected_host == id {
                c.api.selected_host = DEFAULT_HOST_ID.to_string();
            }
            Ok(removed)
        })
    }

    /// Select the host used for new submissions. Only enabled hosts are selectable.
    pub fn select_host(&mut self, id: &str) -> Result<(), ConfigError> {
        self.update(|c| {
            let host = c
                .api
                .host(id)
                .ok_or_else(|| ConfigError::UnknownHost(id.to_string()))?;
            if !host.enabled {
                return Err(ConfigError::Validation {
                    field: "api.selected_host".to_string(),
                    message: format!("host '{}' is disabled", id),
                });
            }
            c.api.selected_host = id.to_string();
            Ok(())
        })
    }

    pub fn set_host_enabled(&mut self, id: &str, enabled: bool) -> Result<(), ConfigError> {
        self.update(|c| {
            let host = c
                .api
                .host_mut(id)
                .ok_or_else(|| ConfigError::UnknownHost(id.to_string()))?;
            host.enabled = enabled;
            Ok(())
        })
    }

    /// Add a custom model. The API value must be unique across the catalog.
    pub fn add_model(
        &mut self,
        name: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<ModelCatalogEntry, ConfigError> {
        let name = name.trim();
        let value = value.trim();
        if name.is_empty() {
            return Err(ConfigError::MissingField("name".to_string()));
        }
        if value.is_empty() {
            return Err(ConfigError::MissingField("value".to_string()));
        }

        self.update(|c| {
            if c.models.iter().any(|m| m.value == value) {
                return Err(ConfigError::DuplicateModelValue(value.to_string()));
            }
            let model = ModelCatalogEntry {
                id: unique_custom_id(c.models.iter().map(|m| m.id.as_str())),
                name: name.to_string(),
                value: value.to_string(),
                enabled: true,
                description: non_blank(description),
                custom: true,
            };
            c.models.push(model.clone());
            Ok(model)
        })
    }

    /// Edit a custom model; `None` keeps the current field.
    pub fn edit_model(
        &mut self,
        id: &str,
        name: Option<&str>,
        value: Option<&str>,
        description: Option<&str>,
    ) -> Result<ModelCatalogEntry, ConfigError> {
        self.update(|c| {
            let index = c
                .models
                .iter()
                .position(|m| m.id == id)
                .ok_or_else(|| ConfigError::UnknownModel(id.to_string()))?;
            if !c.models[index].custom {
                return Err(ConfigError::ProtectedModel(id.to_string()));
            }
            if let Some(value) = value.map(str::trim) {
                if value.is_empty() {
                    return Err(ConfigError::MissingField("value".to_string()));
                }
                if c.models.iter().any(|m| m.value == value && m.id != id) {
                    return Err(ConfigError::DuplicateModelValue(value.to_string()));
                }
            }

            let old_value = c.models[index].value.clone();
            let model = &mut c.models[index];
            if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
                model.name = name.to_string();
            }
            if let Some(value) = value.map(str::trim) {
                model.value = value.to_string();
            }
            if let Some(description) = description {
                model.description = non_blank(Some(description));
            }
            let updated = model.clone();

            if c.generation.default_model == old_value {
                c.generation.default_model = updated.value.clone();
            }
            Ok(updated)
        })
    }

    /// Remove a custom model. Removing the default model promotes the first enabled one.
    pub fn remove_model(&mut self, id: &str) -> Result<ModelCatalogEntry, ConfigError> {
        self.update(|c| {
            let index = c
                .models
                .iter()
                .position(|m| m.id == id)
                .ok_or_else(|| ConfigError::UnknownModel(id.to_string()))?;
            if !c.models[index].custom {
                return Err(ConfigError::ProtectedModel(id.to_string()));
            }
            let removed = c.models.remove(index);
            if c.generation.default_model == removed.value {
                if let Some(first) = c.models.iter().find(|m| m.enabled) {
                    c.generation.default_model = first.value.clone();
                }
            }
            Ok(removed)
        })
    }

    pub fn set_model_enabled(&mut self, id: &str, enabled: bool) -> Result<(), ConfigError> {
        self.update(|c| {
            let model = c
                .models
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or_else(|| ConfigError::UnknownModel(id.to_string()))?;
            model.enabled = enabled;
            Ok(())
        })
    }

    /// Make an enabled catalog entry (matched by id or API value) the default model.
    pub fn set_default_model(&mut self, id_or_value: &str) -> Result<(), ConfigError> {
        self.update(|c| {
            let value = c
                .enabled_models()
                .find(|m| m.id == id_or_value || m.value == id_or_value)
                .map(|m| m.value.clone())
                .ok_or_else(|| ConfigError::UnknownModel(id_or_value.to_string()))?;
            c.generation.default_model = value;
            Ok(())
        })
    }
}

/// `custom_<unix millis>`, suffixed when an id from the same millisecond exists.
fn unique_custom_id<'a>(existing: impl Iterator<Item = &'a str> + Clone) -> String {
    let base = format!("custom_{}", chrono::Utc::now().timestamp_millis());
    if !existing.clone().any(|id| id == base) {
        return base;
    }
    (1..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !existing.clone().any(|id| id == candidate))
        .unwrap_or(base)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
