//! Error types for forge-registry

use std::path::PathBuf;

/// Result type for forge-registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while retrieving or exporting the image table
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No registry token has been set")]
    MissingToken,

    #[error("Registry request failed: {0}")]
    RegistryFetch(#[from] reqwest::Error),

    #[error("Registry returned status {status} for {resource}")]
    RegistryStatus { resource: String, status: u16 },

    #[error("Published label '{name}' is missing on tag '{tag}'")]
    MissingLabel { tag: String, name: String },

    #[error("Published label '{name}' on tag '{tag}' is not usable: {message}")]
    InvalidLabel {
        tag: String,
        name: String,
        message: String,
    },

    #[error("No locked tag found for '{tag}'")]
    NoLockedTag { tag: String },

    #[error("Computed image size for '{tag}' is zero bytes")]
    ZeroSize { tag: String },

    #[error("No table markers found in document")]
    MarkersNotFound,

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
