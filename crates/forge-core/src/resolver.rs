//! The build-target rule interpreter
//!
//! Turns a [`ReleaseDescriptor`] into a fully resolved
//! [`BuildManifest`]: base image, toolchain token, version-filtered
//! command blocks and the composed environment. Resolution is pure;
//! every descriptor resolves independently from the same immutable
//! tables, so batch processing is order-independent.

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::commands::{CommandBlock, CommandCatalog, EnvironmentSet};
use crate::error::Result;
use crate::os::{OperatingSystem, UpstreamImage};
use crate::tables::VersionTable;
use crate::version::NukeVersion;

/// One buildable release target, produced by the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    pub operating_system: OperatingSystem,
    pub version: NukeVersion,
    /// Location of the installable payload. Opaque; never checked for
    /// reachability here.
    pub source_url: String,
}

/// The resolved pieces of one manifest, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildManifest {
    pub operating_system: OperatingSystem,
    pub version: NukeVersion,
    pub source_url: String,
    pub base_image: UpstreamImage,
    /// Toolchain token for this target, substituted into `{toolset}`.
    pub toolchain: String,
    /// Applicable command blocks, image-scoped first, catalog order
    /// preserved.
    pub commands: Vec<CommandBlock>,
    /// Fully composed environment (static OS set plus computed entries).
    pub environment: EnvironmentSet,
    /// Date stamped into the image-created label.
    pub created: NaiveDate,
}

impl BuildManifest {
    /// Canonical relative path the rendered manifest is written to.
    ///
    /// A pure function of (version, operating system) only; this is the
    /// idempotence key the writer deduplicates on.
    pub fn artifact_path(&self) -> PathBuf {
        PathBuf::from(format!(
            "manifests/{}/{}/Manifest",
            self.version, self.operating_system
        ))
    }
}

/// Resolves release descriptors against a version table and command
/// catalog.
#[derive(Debug, Clone)]
pub struct Resolver {
    table: VersionTable,
    catalog: CommandCatalog,
    build_date: NaiveDate,
}

impl Resolver {
    pub fn new(table: VersionTable, catalog: CommandCatalog) -> Self {
        Self {
            table,
            catalog,
            build_date: Utc::now().date_naive(),
        }
    }

    /// Fix the date stamped into generated manifests.
    pub fn with_build_date(mut self, build_date: NaiveDate) -> Self {
        self.build_date = build_date;
        self
    }

    /// Resolve one descriptor into a manifest.
    ///
    /// Fails with [`crate::Error::ConfigurationGap`] when the version
    /// table has no binding for the target; the gap propagates, it is
    /// never papered over with a default.
    pub fn resolve(&self, descriptor: &ReleaseDescriptor) -> Result<BuildManifest> {
        let os = descriptor.operating_system;
        let version = descriptor.version;

        let base_image = base_image_for(os, version);
        let toolchain = self.table.toolchain(os, version.major)?.to_string();
        let commands = self.applicable_commands(base_image, os, version);
        let environment = self.environment(os, version)?;

        debug!(
            os = %os,
            version = %version,
            image = %base_image,
            blocks = commands.len(),
            "resolved build target"
        );

        Ok(BuildManifest {
            operating_system: os,
            version,
            source_url: descriptor.source_url.clone(),
            base_image,
            toolchain,
            commands,
            environment,
            created: self.build_date,
        })
    }

    /// Image-scoped blocks first, then OS-scoped blocks, filtered down
    /// to the ones applicable to this version. Filtering never reorders
    /// the survivors.
    fn applicable_commands(
        &self,
        image: UpstreamImage,
        os: OperatingSystem,
        version: NukeVersion,
    ) -> Vec<CommandBlock> {
        self.catalog
            .for_image(image)
            .iter()
            .chain(self.catalog.for_os(os))
            .filter(|block| block.applies_to(version))
            .cloned()
            .collect()
    }

    /// Static OS environment plus computed entries: the C++ standard on
    /// Linux, the deployment target on macOS, and the Nuke version for
    /// every target.
    fn environment(&self, os: OperatingSystem, version: NukeVersion) -> Result<EnvironmentSet> {
        let static_env = self.catalog.environment_for(os);

        let mut environment = if os == OperatingSystem::Linux {
            let cpp = self.table.cpp_standard(os, version.major)?.to_string();
            static_env.map_values(|value| {
                crate::render::substitute(value, &[("cpp_version", cpp.as_str())])
            })?
        } else {
            static_env
        };

        if os.is_macos() {
            let target = self.table.deployment_target(os, version.major)?;
            environment.push("MACOSX_DEPLOYMENT_TARGET", target);
        }
        environment.push("NUKE_VERSION", version.to_string());

        Ok(environment)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(VersionTable::default(), CommandCatalog::default())
    }
}

/// Base-image rule chain, first match wins. The Linux ladder is checked
/// with `>=` against descending thresholds so a version exactly on a
/// boundary lands in the newer tier.
fn base_image_for(os: OperatingSystem, version: NukeVersion) -> UpstreamImage {
    match os {
        OperatingSystem::Windows => UpstreamImage::DebianBookworm,
        OperatingSystem::MacOs | OperatingSystem::MacOsArm => UpstreamImage::DebianBookwormSlim,
        OperatingSystem::Linux => {
            if version >= NukeVersion::new(15, 0) {
                UpstreamImage::RockyLinux8
            } else {
                UpstreamImage::Manylinux2014
            }
        }
    }
}
