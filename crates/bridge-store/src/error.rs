//! Store error types.

use std::path::{Path, PathBuf};

/// Errors raised while persisting a deploy.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The layout could not be serialized.
    #[error("Failed to serialize layout: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The blocking write task panicked or was cancelled.
    #[error("Write task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StoreError {
    /// Creates an IO error with path context.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
