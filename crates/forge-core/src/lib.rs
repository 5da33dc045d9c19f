//! Build-manifest synthesis engine for nukeforge
//!
//! Resolves a (operating system, Nuke version) pair into a complete,
//! deterministic Dockerfile: base image, toolchain, version-scoped
//! command blocks, environment and structural directives. Pure
//! computation only; fetching releases and writing files live in
//! `forge-collector`.

pub mod commands;
pub mod constants;
pub mod error;
pub mod os;
pub mod render;
pub mod resolver;
pub mod tables;
pub mod version;

pub use commands::{CommandBlock, CommandCatalog, EnvironmentSet};
pub use error::{Error, Result};
pub use os::{OperatingSystem, UpstreamImage};
pub use render::render;
pub use resolver::{BuildManifest, ReleaseDescriptor, Resolver};
pub use tables::VersionTable;
pub use version::NukeVersion;
