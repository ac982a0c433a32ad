//! Vocabulary engine error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or walking the vocabulary graph.
#[derive(Debug, Error)]
pub enum VocabError {
    /// The remote fetch failed below HTTP (DNS, TLS, connection reset, ...).
    #[error("Failed to download vocabulary from {url}: {message}")]
    Download { url: String, message: String },

    /// The remote answered with a non-success status.
    #[error("Failed to download vocabulary from {url}: unexpected status code {status}")]
    Status { url: String, status: u16 },

    /// The download did not finish before its deadline.
    #[error("Vocabulary download from {url} timed out")]
    Timeout { url: String },

    /// IO error on the local cache file.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON-LD triple data.
    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// Following `subClassOf` edges led back to an already visited class.
    #[error("Cyclic class hierarchy detected at {class}")]
    CyclicHierarchy { class: String },
}

impl VocabError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VocabError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<String>, message: impl ToString) -> Self {
        VocabError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Whether the error came from fetching the remote document.
    pub fn is_download(&self) -> bool {
        matches!(
            self,
            VocabError::Download { .. } | VocabError::Status { .. } | VocabError::Timeout { .. }
        )
    }
}
