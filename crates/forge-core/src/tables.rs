//! Static version-to-toolchain bindings

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::os::OperatingSystem;

/// Immutable mappings from a Nuke major version to the toolchain needed
/// to compile against it, per OS family, plus the derived values (C++
/// standard, macOS deployment target).
///
/// Lookups are pure; a missing entry is a fatal
/// [`Error::ConfigurationGap`] carrying the offending (OS, major) pair.
/// Silent defaulting is deliberately absent: a guessed toolchain
/// produces an image that fails at build time, far from the actual
/// mistake.
#[derive(Debug, Clone)]
pub struct VersionTable {
    linux_toolsets: BTreeMap<u32, String>,
    windows_buildtools: BTreeMap<u32, String>,
    macos_sdks: BTreeMap<u32, String>,
    cpp_standards: BTreeMap<u32, u32>,
    macos_deployment_targets: BTreeMap<u32, String>,
}

impl VersionTable {
    pub fn new(
        linux_toolsets: BTreeMap<u32, String>,
        windows_buildtools: BTreeMap<u32, String>,
        macos_sdks: BTreeMap<u32, String>,
        cpp_standards: BTreeMap<u32, u32>,
        macos_deployment_targets: BTreeMap<u32, String>,
    ) -> Self {
        Self {
            linux_toolsets,
            windows_buildtools,
            macos_sdks,
            cpp_standards,
            macos_deployment_targets,
        }
    }

    /// Toolchain token for (OS family, major version): a gcc toolset
    /// name on Linux, a Visual Studio build-tools major on Windows, a
    /// macOS SDK archive URL for both macOS variants.
    pub fn toolchain(&self, os: OperatingSystem, major: u32) -> Result<&str> {
        let table = match os {
            OperatingSystem::Linux => &self.linux_toolsets,
            OperatingSystem::Windows => &self.windows_buildtools,
            OperatingSystem::MacOs | OperatingSystem::MacOsArm => &self.macos_sdks,
        };
        table
            .get(&major)
            .map(String::as_str)
            .ok_or(Error::ConfigurationGap { os, major })
    }

    /// C++ standard the plugin must be compiled with.
    pub fn cpp_standard(&self, os: OperatingSystem, major: u32) -> Result<u32> {
        self.cpp_standards
            .get(&major)
            .copied()
            .ok_or(Error::ConfigurationGap { os, major })
    }

    /// Minimum macOS version built binaries will run on.
    pub fn deployment_target(&self, os: OperatingSystem, major: u32) -> Result<&str> {
        self.macos_deployment_targets
            .get(&major)
            .map(String::as_str)
            .ok_or(Error::ConfigurationGap { os, major })
    }
}

/// The shipped bindings for all currently supported Nuke majors.
impl Default for VersionTable {
    fn default() -> Self {
        let linux_toolsets = [
            (16, "gcc-toolset-11"),
            (15, "gcc-toolset-11"),
            (14, "devtoolset-9"),
            (13, "devtoolset-6"),
        ]
        .map(|(major, toolset)| (major, toolset.to_string()));

        let windows_buildtools =
            [(16, "17"), (15, "17"), (14, "16"), (13, "15")]
                .map(|(major, tools)| (major, tools.to_string()));

        let macos_sdks = [
            (16, "13.3/MacOSX13.3.sdk.tar.xz"),
            (15, "13.3/MacOSX13.3.sdk.tar.xz"),
            (14, "12.3/MacOSX12.3.sdk.tar.xz"),
            (13, "11.3/MacOSX11.3.sdk.tar.xz"),
        ]
        .map(|(major, archive)| {
            (
                major,
                format!(
                    "https://github.com/joseluisq/macosx-sdks/releases/download/{archive}"
                ),
            )
        });

        let cpp_standards = [(16, 17), (15, 17), (14, 17), (13, 14), (12, 14)];

        let macos_deployment_targets = [
            (16, "12.0"),
            (15, "11.0"),
            (14, "10.15"),
            (13, "10.14"),
        ]
        .map(|(major, target)| (major, target.to_string()));

        Self::new(
            linux_toolsets.into_iter().collect(),
            windows_buildtools.into_iter().collect(),
            macos_sdks.into_iter().collect(),
            cpp_standards.into_iter().collect(),
            macos_deployment_targets.into_iter().collect(),
        )
    }
}
