//! Error types for result delivery.

use super::DeliveryStep;
use crate::api::ApiError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while downloading, saving or inserting a finished video.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("video download failed: {0}")]
    Download(#[from] ApiError),

    #[error("failed to save video to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to update note {path}: {source}")]
    Note {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no active note to insert into")]
    NoActiveNote,

    #[error("selected text not found in note {0}")]
    SelectionNotFound(PathBuf),
}

/// A plan that stopped part-way. Steps in `completed` are not rolled back.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct DeliveryFailure {
    pub completed: Vec<DeliveryStep>,
    pub failed_step: DeliveryStep,
    #[source]
    pub error: DeliveryError,
}

impl DeliveryFailure {
    /// True when a link or embed already landed in the note.
    pub fn inserted_before_failure(&self) -> bool {
        self.completed.iter().any(DeliveryStep::is_insert)
    }
}
