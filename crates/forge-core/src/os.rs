//! Operating system and upstream image enumerations

use std::fmt;

/// Target operating system a generated manifest compiles plugins for.
///
/// All images run on Linux; Windows and macOS targets are cross-compile
/// environments layered on a Debian base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingSystem {
    Linux,
    Windows,
    MacOs,
    MacOsArm,
}

impl OperatingSystem {
    /// Stable lowercase identifier used in artifact paths and image labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::MacOsArm => "macos-arm",
        }
    }

    /// Map a platform key from the upstream release catalog.
    ///
    /// Returns `None` for keys the engine has no rule for; the caller
    /// decides whether that is skippable or fatal.
    pub fn from_platform_key(key: &str) -> Option<Self> {
        match key {
            "linux_x86_64" => Some(Self::Linux),
            "windows_x86_64" => Some(Self::Windows),
            "mac_x86_64" => Some(Self::MacOs),
            "mac_arm" => Some(Self::MacOsArm),
            _ => None,
        }
    }

    pub fn is_macos(&self) -> bool {
        matches!(self, Self::MacOs | Self::MacOsArm)
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream image a generated manifest is layered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamImage {
    /// Linux builds for Nuke 15 and up.
    RockyLinux8,
    /// Linux builds below 15, glibc-compatible with the VFX 2014 platform.
    Manylinux2014,
    /// Windows cross-compile base (msvc-wine).
    DebianBookworm,
    /// macOS cross-compile base (osxcross).
    DebianBookwormSlim,
}

impl UpstreamImage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RockyLinux8 => "rockylinux:8",
            Self::Manylinux2014 => "quay.io/pypa/manylinux2014_x86_64",
            Self::DebianBookworm => "debian:bookworm",
            Self::DebianBookwormSlim => "debian:bookworm-slim",
        }
    }
}

impl fmt::Display for UpstreamImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_keys_map_to_variants() {
        assert_eq!(
            OperatingSystem::from_platform_key("linux_x86_64"),
            Some(OperatingSystem::Linux)
        );
        assert_eq!(
            OperatingSystem::from_platform_key("windows_x86_64"),
            Some(OperatingSystem::Windows)
        );
        assert_eq!(
            OperatingSystem::from_platform_key("mac_x86_64"),
            Some(OperatingSystem::MacOs)
        );
        assert_eq!(
            OperatingSystem::from_platform_key("mac_arm"),
            Some(OperatingSystem::MacOsArm)
        );
        assert_eq!(OperatingSystem::from_platform_key("solaris_sparc"), None);
    }

    #[test]
    fn display_uses_lowercase_identifiers() {
        assert_eq!(OperatingSystem::Linux.to_string(), "linux");
        assert_eq!(OperatingSystem::MacOsArm.to_string(), "macos-arm");
        assert_eq!(UpstreamImage::RockyLinux8.to_string(), "rockylinux:8");
    }

    #[test]
    fn macos_variants_are_grouped() {
        assert!(OperatingSystem::MacOs.is_macos());
        assert!(OperatingSystem::MacOsArm.is_macos());
        assert!(!OperatingSystem::Linux.is_macos());
        assert!(!OperatingSystem::Windows.is_macos());
    }
}
