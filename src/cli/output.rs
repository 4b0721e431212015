//! Output formatting helpers for CLI commands

use crate::config::{HostEndpointConfig, ModelCatalogEntry, VidnoteConfig};
use crate::poll::JobStatus;
use crate::workflow::{Notice, NoticeLevel, Notifier};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// View model for host display
#[derive(Debug, Clone, serde::Serialize)]
pub struct HostView {
    pub id: String,
    pub name: String,
    pub url: String,
    pub enabled: bool,
    pub selected: bool,
    pub builtin: bool,
    pub description: Option<String>,
}

impl HostView {
    pub fn from_host(host: &HostEndpointConfig, selected_id: &str) -> Self {
        Self {
            id: host.id.clone(),
            name: host.name.clone(),
            url: host.url.clone(),
            enabled: host.enabled,
            selected: host.id == selected_id,
            builtin: host.is_builtin(),
            description: host.description.clone(),
        }
    }
}

/// View model for model display
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelView {
    pub id: String,
    pub name: String,
    pub value: String,
    pub enabled: bool,
    pub default: bool,
    pub custom: bool,
}

impl ModelView {
    pub fn from_entry(model: &ModelCatalogEntry, default_value: &str) -> Self {
        Self {
            id: model.id.clone(),
            name: model.name.clone(),
            value: model.value.clone(),
            enabled: model.enabled,
            default: model.value == default_value,
            custom: model.custom,
        }
    }
}

pub fn host_views(config: &VidnoteConfig) -> Vec<HostView> {
    config
        .api
        .hosts
        .iter()
        .map(|h| HostView::from_host(h, &config.api.selected_host))
        .collect()
}

pub fn model_views(config: &VidnoteConfig) -> Vec<ModelView> {
    config
        .models
        .iter()
        .map(|m| ModelView::from_entry(m, &config.generation.default_model))
        .collect()
}

fn enabled_cell(enabled: bool) -> String {
    if enabled {
        "Enabled".green().to_string()
    } else {
        "Disabled".red().to_string()
    }
}

/// Format hosts as a table
pub fn format_hosts_table(hosts: &[HostView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "ID", "Name", "URL", "Status", "Kind"]);

    for h in hosts {
        table.add_row(vec![
            Cell::new(if h.selected { "*" } else { "" }),
            Cell::new(&h.id),
            Cell::new(&h.name),
            Cell::new(&h.url),
            Cell::new(enabled_cell(h.enabled)),
            Cell::new(if h.builtin { "built-in" } else { "custom" }),
        ]);
    }

    table.to_string()
}

/// Format hosts as JSON
pub fn format_hosts_json(hosts: &[HostView]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({ "hosts": hosts }))
}

/// Format models as a table
pub fn format_models_table(models: &[ModelView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "ID", "Name", "API Value", "Status", "Kind"]);

    for m in models {
        table.add_row(vec![
            Cell::new(if m.default { "*" } else { "" }),
            Cell::new(&m.id),
            Cell::new(&m.name),
            Cell::new(&m.value),
            Cell::new(enabled_cell(m.enabled)),
            Cell::new(if m.custom { "custom" } else { "built-in" }),
        ]);
    }

    table.to_string()
}

/// Format models as JSON
pub fn format_models_json(models: &[ModelView]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({ "models": models }))
}

/// Format one status snapshot as a two-column table
pub fn format_status_table(task_id: &str, status: &JobStatus) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    let state = status
        .state
        .as_ref()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    table.add_row(vec![Cell::new("Task"), Cell::new(task_id)]);
    table.add_row(vec![Cell::new("State"), Cell::new(state)]);
    table.add_row(vec![
        Cell::new("Progress"),
        Cell::new(format!("{}%", status.progress_percent)),
    ]);
    table.add_row(vec![
        Cell::new("Video URL"),
        Cell::new(status.terminal_video_url.as_deref().unwrap_or("-")),
    ]);
    if let Some(message) = &status.failure_message {
        table.add_row(vec![Cell::new("Failure"), Cell::new(message.red().to_string())]);
    }

    table.to_string()
}

/// Get icon for a notice level
pub fn level_icon(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "•",
        NoticeLevel::Success => "✓",
        NoticeLevel::Warning => "!",
        NoticeLevel::Error => "✗",
    }
}

/// Prints notices to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    pub fn render(notice: &Notice) -> String {
        let level = notice.level();
        let line = format!("{} {}", level_icon(level), notice);
        match level {
            NoticeLevel::Info => line.dimmed().to_string(),
            NoticeLevel::Success => line.green().to_string(),
            NoticeLevel::Warning => line.yellow().to_string(),
            NoticeLevel::Error => line.red().to_string(),
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: &Notice) {
        tracing::debug!(notice = %notice, "Notice");
        eprintln!("{}", Self::render(notice));
    }
}
