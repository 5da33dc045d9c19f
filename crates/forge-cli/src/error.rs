//! Error types for forge-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from the synthesis engine
    #[error(transparent)]
    Core(#[from] forge_core::Error),

    /// Error from catalog collection or manifest writing
    #[error(transparent)]
    Collector(#[from] forge_collector::Error),

    /// Error from the registry reporting pipeline
    #[error(transparent)]
    Registry(#[from] forge_registry::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
