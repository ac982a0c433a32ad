use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    #[error("Page not found: {schema}/{identifier}")]
    PageNotFound { schema: String, identifier: String },

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means the requested item does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::SchemaNotFound(_) | StorageError::PageNotFound { .. }
        )
    }
}
