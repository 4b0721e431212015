//! Shared helpers for vidnote integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use vidnote::config::{HostEndpointConfig, VidnoteConfig};
use wiremock::MockServer;

pub const TEST_KEY: &str = "sk-test-123456";

/// Configuration whose selected host is the mock server, with fast polling.
pub fn config_for(server: &MockServer) -> VidnoteConfig {
    let mut config = VidnoteConfig::default();
    config.api.key = TEST_KEY.to_string();
    config.api.timeout_seconds = 5;
    config.api.hosts.push(HostEndpointConfig {
        id: "mock".to_string(),
        name: "Mock".to_string(),
        url: server.uri(),
        enabled: true,
        description: None,
    });
    config.api.selected_host = "mock".to_string();
    config.polling.interval_ms = 20;
    config.polling.max_attempts = 10;
    config.polling.min_display_ms = 0;
    config
}

/// Write a note into `dir` and return its path.
pub fn write_note(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("note.md");
    std::fs::write(&path, content).unwrap();
    path
}

/// Files saved under the video folder next to a note.
pub fn saved_videos(dir: &Path, folder: &str) -> Vec<PathBuf> {
    match std::fs::read_dir(dir.join(folder)) {
        Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(_) => Vec::new(),
    }
}
