//! Writing downloaded videos next to the note.

use super::DeliveryError;
use crate::config::OutputConfig;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Characters of the source text used in the file name.
const SNIPPET_CHARS: usize = 20;

/// Where a downloaded video landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedVideo {
    pub path: PathBuf,
    pub file_name: String,
}

/// Binary write surface scoped to the active note's folder.
#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SavedVideo, DeliveryError>;
}

/// Stores videos in a subfolder of the note's directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct FolderStore {
    dir: PathBuf,
}

impl FolderStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<note dir>/<folder>`. A note without a parent directory stores into `<folder>`.
    pub fn beside_note(note: &Path, folder: &str) -> Self {
        let parent = note.parent().unwrap_or_else(|| Path::new(""));
        Self::new(parent.join(folder))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl VideoStore for FolderStore {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SavedVideo, DeliveryError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| DeliveryError::Save {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| DeliveryError::Save {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Video saved");
        Ok(SavedVideo {
            path,
            file_name: file_name.to_string(),
        })
    }
}

/// Up to the first 20 characters of `text`, keeping word characters and
/// whitespace, with whitespace runs collapsed to `-`.
pub fn snippet(text: &str) -> String {
    let kept: String = text
        .chars()
        .take(SNIPPET_CHARS)
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let mut out = String::with_capacity(kept.len());
    let mut in_space = false;
    for c in kept.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// `<prefix>-<snippet>-<millis>.<extension>`
pub fn file_name(output: &OutputConfig, source_text: &str, unix_millis: i64) -> String {
    format!(
        "{}-{}-{}.{}",
        output.file_prefix,
        snippet(source_text),
        unix_millis,
        output.extension
    )
}
