//! Status command implementation

use crate::api::{resolve_base_url, ApiClient, VideoGateway};
use crate::cli::output::format_status_table;
use crate::cli::StatusArgs;
use crate::config::VidnoteConfig;
use crate::poll::JobStatus;
use std::sync::Arc;

/// Base URL for `status`: an explicit host id, or the usual resolution.
pub fn status_base_url(
    args: &StatusArgs,
    config: &VidnoteConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    match &args.host {
        Some(id) => {
            let host = config
                .api
                .host(id)
                .ok_or_else(|| format!("Host not found: {}", id))?;
            Ok(host.url.trim().trim_end_matches('/').to_string())
        }
        None => Ok(resolve_base_url(&config.api)?),
    }
}

/// Handle `vidnote status`
pub async fn handle_status(
    args: &StatusArgs,
    config: VidnoteConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let base_url = status_base_url(args, &config)?;
    let client = ApiClient::new(Arc::new(config))?;

    let payload = client.fetch_status(&base_url, &args.task_id).await?;

    if args.json {
        return Ok(serde_json::to_string_pretty(&payload)?);
    }
    let status = JobStatus::from_payload(payload);
    Ok(format_status_table(&args.task_id, &status))
}
