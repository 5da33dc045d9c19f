//! External collaborators for manifest generation
//!
//! Fetches the upstream release catalog, turns it into build targets
//! for the `forge-core` synthesis engine, and persists rendered
//! manifests with skip-if-exists deduplication.

pub mod catalog;
pub mod collect;
pub mod error;
pub mod writer;

pub use catalog::{ReleaseCatalog, fetch_release_catalog};
pub use collect::{CollectorConfig, ErrorPolicy, collect_descriptors};
pub use error::{Error, Result};
pub use writer::{WriteReport, write_manifests};
