//! Turning the release catalog into build targets

use forge_core::{NukeVersion, OperatingSystem, ReleaseDescriptor};
use tracing::{info, warn};

use crate::catalog::ReleaseCatalog;
use crate::error::Result;

/// What to do when a single catalog record cannot be processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Warn and continue with the rest of the batch. A wrong manifest
    /// for one target is worse than a missing one, but a missing one
    /// is no reason to lose the rest.
    #[default]
    SkipRecord,
    /// Abort the whole batch on the first bad record.
    Abort,
}

/// Collection settings.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Majors below this are end-of-life and skipped entirely.
    pub eol_floor: u32,
    pub on_error: ErrorPolicy,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            eol_floor: 13,
            on_error: ErrorPolicy::SkipRecord,
        }
    }
}

/// Convert a fetched catalog into release descriptors.
///
/// Tokens without the `v` patch marker and platform keys with no mapped
/// operating system are bad records; depending on the configured policy
/// they either skip that record or abort the batch. Platforms without
/// an installer URL are always skipped: an unpublished release is
/// normal, not an error.
pub fn collect_descriptors(
    catalog: &ReleaseCatalog,
    config: &CollectorConfig,
) -> Result<Vec<ReleaseDescriptor>> {
    let mut descriptors = Vec::new();

    for (token, release) in catalog.releases() {
        let version = match NukeVersion::from_release_token(token) {
            Ok(version) => version,
            Err(err) => match config.on_error {
                ErrorPolicy::SkipRecord => {
                    warn!(token, %err, "skipping malformed release token");
                    continue;
                }
                ErrorPolicy::Abort => return Err(err.into()),
            },
        };

        if version.major < config.eol_floor {
            continue;
        }

        for (platform_key, installer_url) in &release.installer {
            let Some(url) = installer_url else {
                continue;
            };
            let Some(operating_system) = OperatingSystem::from_platform_key(platform_key) else {
                match config.on_error {
                    ErrorPolicy::SkipRecord => {
                        warn!(
                            platform_key,
                            token, "no operating system mapped for platform key"
                        );
                        continue;
                    }
                    ErrorPolicy::Abort => {
                        return Err(forge_core::Error::UnsupportedTarget {
                            key: platform_key.clone(),
                        }
                        .into());
                    }
                }
            };
            descriptors.push(ReleaseDescriptor {
                operating_system,
                version,
                source_url: url.clone(),
            });
        }
    }

    info!(count = descriptors.len(), "collected build targets");
    Ok(descriptors)
}
