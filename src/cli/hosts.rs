//! Hosts command implementation

use crate::api::ApiClient;
use crate::classify;
use crate::cli::output::{format_hosts_json, format_hosts_table, host_views};
use crate::cli::{HostsAddArgs, HostsTestArgs, IdArgs, ListArgs};
use crate::config::{SettingsStore, VidnoteConfig};
use std::sync::Arc;

/// Handle `vidnote hosts list`
pub fn handle_hosts_list(
    args: &ListArgs,
    config: &VidnoteConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let views = host_views(config);
    if args.json {
        Ok(format_hosts_json(&views)?)
    } else {
        Ok(format_hosts_table(&views))
    }
}

/// Handle `vidnote hosts add`
pub fn handle_hosts_add(
    args: &HostsAddArgs,
    store: &mut SettingsStore,
) -> Result<String, Box<dyn std::error::Error>> {
    let host = store.add_host(&args.name, &args.url, args.description.as_deref())?;
    tracing::info!(id = %host.id, url = %host.url, "Host added");
    Ok(format!("✓ Added host {} ({}) as {}", host.name, host.url, host.id))
}

/// Handle `vidnote hosts remove`
pub fn handle_hosts_remove(
    args: &IdArgs,
    store: &mut SettingsStore,
) -> Result<String, Box<dyn std::error::Error>> {
    let removed = store.remove_host(&args.id)?;
    Ok(format!(
        "✓ Removed host {} (selected: {})",
        removed.name,
        store.config().api.selected_host
    ))
}

/// Handle `vidnote hosts select`
pub fn handle_hosts_select(
    args: &IdArgs,
    store: &mut SettingsStore,
) -> Result<String, Box<dyn std::error::Error>> {
    store.select_host(&args.id)?;
    Ok(format!("✓ Selected host {}", args.id))
}

/// Handle `vidnote hosts enable` / `vidnote hosts disable`
pub fn handle_hosts_set_enabled(
    args: &IdArgs,
    enabled: bool,
    store: &mut SettingsStore,
) -> Result<String, Box<dyn std::error::Error>> {
    store.set_host_enabled(&args.id, enabled)?;
    let state = if enabled { "Enabled" } else { "Disabled" };
    Ok(format!("✓ {} host {}", state, args.id))
}

/// Handle `vidnote hosts test`
pub async fn handle_hosts_test(
    args: &HostsTestArgs,
    config: VidnoteConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let id = args
        .id
        .clone()
        .unwrap_or_else(|| config.api.selected_host.clone());
    let host = config
        .api
        .host(&id)
        .cloned()
        .ok_or_else(|| format!("Host not found: {}", id))?;

    let client = ApiClient::new(Arc::new(config))?;
    match client.test_host(&host).await {
        Ok(()) => Ok(format!("✓ {} is reachable ({})", host.name, host.url)),
        Err(e) => {
            let category = classify::classify_error(&e);
            Err(format!("✗ {} connection failed: {}", host.name, category).into())
        }
    }
}
