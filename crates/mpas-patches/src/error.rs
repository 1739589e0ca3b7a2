//! Error types for patch building and caching.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for patch operations.
pub type PatchResult<T> = Result<T, PatchError>;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed patch cache {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache format version {found} is not supported (expected {expected})")]
    UnsupportedVersion { expected: u32, found: u32 },

    #[error("Patch cache was built for a different mesh ({found}, expected {expected})")]
    Stale { expected: String, found: String },

    #[error("Failed to encode patch cache: {0}")]
    Encode(#[from] serde_json::Error),
}

impl PatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::Io {
            path: path.into(),
            source,
        }
    }
}
