//! Error types for forge-collector

use std::path::PathBuf;

/// Result type for forge-collector operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while collecting releases or writing manifests
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Synthesis error: {0}")]
    Core(#[from] forge_core::Error),

    #[error("Failed to fetch release catalog: {0}")]
    SourceFetch(#[from] reqwest::Error),

    #[error("Release catalog returned status {status} from {url}")]
    SourceStatus { url: String, status: u16 },

    #[error("Failed to decode release catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
