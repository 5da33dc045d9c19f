//! Shared constants for generated manifests

/// Directory the Nuke installation is staged into inside the image.
pub const NUKE_INSTALL_DIR: &str = "/usr/local/nuke_install";

/// Working directory plugin builds run from.
pub const BUILD_DIR: &str = "/nuke_build_directory";

/// Directory auxiliary toolchain files are copied to (Windows targets).
pub const TOOLCHAIN_DIR: &str = "/nukeforge";

/// Label namespace for data published on built images.
pub const LABEL_PREFIX: &str = "com.nukeforge";

/// Project URL published in the OCI labels.
pub const PROJECT_URL: &str = "https://github.com/user/nukeforge";
