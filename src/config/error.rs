//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Host '{0}' not found")]
    UnknownHost(String),

    #[error("Host '{0}' is built in and cannot be removed")]
    ProtectedHost(String),

    #[error("A host with URL '{0}' already exists")]
    DuplicateHostUrl(String),

    #[error("Model '{0}' not found")]
    UnknownModel(String),

    #[error("Model '{0}' is built in and cannot be edited or removed")]
    ProtectedModel(String),

    #[error("A model with API value '{0}' already exists")]
    DuplicateModelValue(String),
}
