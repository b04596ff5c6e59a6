//! Error types for Knowledge Object packaging and page generation

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KoError {
    #[error("Failed to load metadata from {path}: {reason}")]
    MetadataLoad { path: String, reason: String },

    #[error("Invalid metadata structure: {0}")]
    InvalidMetadata(String),

    #[error("Missing metadata field '{0}'")]
    MissingField(String),

    #[error("Failed to fetch context {url}: {reason}")]
    ContextFetch { url: String, reason: String },

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),
}

pub type Result<T> = std::result::Result<T, KoError>;
