//! Result handling for finished jobs.
//!
//! Locates the video URL in the terminal payload and runs the surface's ordered
//! delivery plan: download into the note's folder, embed the saved file, or link
//! the remote URL.

mod error;
mod note;
mod store;

pub use error::{DeliveryError, DeliveryFailure};
pub use note::{MarkdownNote, NoteSurface, CURSOR_MARKER};
pub use store::{file_name, snippet, FolderStore, SavedVideo, VideoStore};

use crate::api::VideoGateway;
use crate::config::OutputConfig;
use crate::extract::{self, FieldPath, UrlValidity};
use serde_json::Value;
use std::sync::Arc;

/// One delivery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStep {
    /// Download the video and save it beside the note
    Download,
    /// Replace the selection with an embed of the saved file; downloads first if needed
    InsertEmbed,
    /// Insert a link to the remote URL at the cursor
    InsertLink,
}

impl DeliveryStep {
    pub fn is_insert(&self) -> bool {
        matches!(self, DeliveryStep::InsertEmbed | DeliveryStep::InsertLink)
    }
}

impl std::fmt::Display for DeliveryStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStep::Download => write!(f, "download"),
            DeliveryStep::InsertEmbed => write!(f, "insert embed"),
            DeliveryStep::InsertLink => write!(f, "insert link"),
        }
    }
}

/// `\n\n![[<file name>]]\n\n`
pub fn embed_markdown(file_name: &str) -> String {
    format!("\n\n![[{}]]\n\n", file_name)
}

/// `![Generated Video](<url>)`
pub fn link_markdown(url: &str) -> String {
    format!("![Generated Video]({})", url)
}

/// What a completed plan did.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReport {
    pub video_url: String,
    pub found_at: FieldPath,
    pub saved: Option<SavedVideo>,
    pub steps: Vec<DeliveryStep>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Delivered(DeliveryReport),
    /// The job succeeded but the payload carried no usable URL
    NoVideoUrl { payload: Value },
}

/// Runs delivery plans against a gateway and a video store.
pub struct ResultHandler {
    gateway: Arc<dyn VideoGateway>,
    store: Arc<dyn VideoStore>,
    output: OutputConfig,
}

impl ResultHandler {
    pub fn new(
        gateway: Arc<dyn VideoGateway>,
        store: Arc<dyn VideoStore>,
        output: OutputConfig,
    ) -> Self {
        Self {
            gateway,
            store,
            output,
        }
    }

    /// Locate the URL in `payload` and run `plan` in order.
    ///
    /// The first failing step stops the plan. `source_text` names the saved file.
    pub async fn deliver(
        &self,
        payload: &Value,
        validity: UrlValidity,
        plan: &[DeliveryStep],
        source_text: &str,
        mut note: Option<&mut (dyn NoteSurface + '_)>,
    ) -> Result<DeliveryOutcome, DeliveryFailure> {
        let Some((found_at, video_url)) = extract::locate_video_url(payload, validity) else {
            tracing::warn!(payload = %payload, "No video URL in terminal payload");
            return Ok(DeliveryOutcome::NoVideoUrl {
                payload: payload.clone(),
            });
        };
        tracing::info!(url = %video_url, field = %found_at, "Video URL located");

        let mut saved: Option<SavedVideo> = None;
        let mut completed = Vec::with_capacity(plan.len());

        for &step in plan {
            let result = match step {
                DeliveryStep::Download => self
                    .ensure_saved(&mut saved, &video_url, source_text)
                    .await
                    .map(|_| ()),
                DeliveryStep::InsertEmbed => {
                    match self.ensure_saved(&mut saved, &video_url, source_text).await {
                        Ok(file) => {
                            let embed = embed_markdown(&file.file_name);
                            match note.as_deref_mut() {
                                Some(n) => n.replace_selection(&embed).await,
                                None => Err(DeliveryError::NoActiveNote),
                            }
                        }
                        Err(e) => Err(e),
                    }
                }
                DeliveryStep::InsertLink => match note.as_deref_mut() {
                    Some(n) => n.insert_at_cursor(&link_markdown(&video_url)).await,
                    None => Err(DeliveryError::NoActiveNote),
                },
            };

            if let Err(error) = result {
                tracing::warn!(step = %step, error = %error, "Delivery step failed");
                return Err(DeliveryFailure {
                    completed,
                    failed_step: step,
                    error,
                });
            }
            completed.push(step);
        }

        Ok(DeliveryOutcome::Delivered(DeliveryReport {
            video_url,
            found_at,
            saved,
            steps: completed,
        }))
    }

    async fn ensure_saved(
        &self,
        saved: &mut Option<SavedVideo>,
        url: &str,
        source_text: &str,
    ) -> Result<SavedVideo, DeliveryError> {
        if let Some(existing) = saved {
            return Ok(existing.clone());
        }
        let bytes = self.gateway.download(url).await?;
        let name = file_name(
            &self.output,
            source_text,
            chrono::Utc::now().timestamp_millis(),
        );
        let file = self.store.save(&name, &bytes).await?;
        *saved = Some(file.clone());
        Ok(file)
    }
}
