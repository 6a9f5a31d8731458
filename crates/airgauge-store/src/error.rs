//! Error types for airgauge-store.

use std::path::PathBuf;

/// Result type for airgauge-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in airgauge-store.
///
/// Reading a snapshot never fails: a missing or corrupt file falls back to
/// an empty default. Only writes surface errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Failed to create the data directory.
    #[error("Failed to create data directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
