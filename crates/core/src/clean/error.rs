use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while removing a broken link.
#[derive(Debug, Error)]
pub enum DeletionError {
    #[error("Failed to delete {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
