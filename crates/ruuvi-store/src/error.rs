//! Error types for ruuvi-store.

use std::path::PathBuf;

/// Result type for ruuvi-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ruuvi-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to read the cache file.
    #[error("Failed to read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The cache file exists but does not hold a valid cache document.
    #[error("Failed to parse cache file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to write or replace the cache file.
    #[error("Failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create the cache directory.
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to encode a record's significant fields.
    #[error("Failed to compute fingerprint: {0}")]
    Fingerprint(#[source] serde_json::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
