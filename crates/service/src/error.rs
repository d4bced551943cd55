//! Error types for the store and service layers.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by variable store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read store file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse store file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write store file at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unable to determine a storage directory: {0}")]
    DirUnavailable(String),
}

/// Errors surfaced by `EnvVarService` operations.
///
/// Only store failures are fatal to a write; env-file trouble degrades to
/// the partial-success modes reported through `WriteOutcome`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(
        "Invalid variable name \"{key}\": must start with a letter or underscore \
         and contain only alphanumeric characters and underscores"
    )]
    InvalidKey { key: String },

    #[error("Permission denied: {action} on {resource}")]
    PermissionDenied { resource: String, action: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
