//! Error types for forge-core

use crate::os::OperatingSystem;

/// Result type for forge-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or rendering a build manifest
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Not a valid release token: '{token}' (expected <major>.<minor>v<patch>)")]
    MalformedVersion { token: String },

    #[error("No toolchain mapping for {os} at major version {major}")]
    ConfigurationGap { os: OperatingSystem, major: u32 },

    #[error("No resolution rule for target '{key}'")]
    UnsupportedTarget { key: String },

    #[error("Placeholder '{{{name}}}' has no value in scope")]
    UnresolvedPlaceholder { name: String },
}
