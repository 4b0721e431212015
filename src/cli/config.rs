//! Config command handlers

use crate::cli::{ConfigInitArgs, ListArgs, SetKeyArgs};
use crate::config::{SettingsStore, VidnoteConfig};
use crate::logging::mask_secret;
use std::fs;
use std::path::Path;

const EXAMPLE_CONFIG: &str = include_str!("../../vidnote.example.toml");

/// Handle `vidnote config init` command
pub fn handle_config_init(
    args: &ConfigInitArgs,
    config_path: &Path,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = args.output.as_deref().unwrap_or(config_path);
    if output.exists() && !args.force {
        return Err(format!(
            "File already exists: {}. Use --force to overwrite.",
            output.display()
        )
        .into());
    }

    fs::write(output, EXAMPLE_CONFIG)?;

    Ok(format!(
        "✓ Configuration file created: {}\n  Set your API key with `vidnote config set-key <KEY>`.",
        output.display()
    ))
}

/// Handle `vidnote config show` command
pub fn handle_config_show(
    args: &ListArgs,
    config: &VidnoteConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut shown = config.clone();
    shown.api.key = mask_secret(&config.api.key);
    if args.json {
        Ok(serde_json::to_string_pretty(&shown)?)
    } else {
        Ok(toml::to_string_pretty(&shown)?)
    }
}

/// Handle `vidnote config set-key` command
pub fn handle_config_set_key(
    args: &SetKeyArgs,
    store: &mut SettingsStore,
) -> Result<String, Box<dyn std::error::Error>> {
    store.set_api_key(&args.key)?;
    Ok(format!(
        "✓ API key saved to {} ({})",
        store.path().display(),
        mask_secret(args.key.trim())
    ))
}
