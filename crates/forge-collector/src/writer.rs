//! Idempotent manifest persistence
//!
//! Renders resolved manifests and writes each one at its canonical
//! path under the output directory. A path that already exists on disk
//! is authoritative: it is never rewritten, so reruns only add
//! manifests for newly observed releases.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;
use forge_core::{BuildManifest, render};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Outcome of one write batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: usize,
    pub skipped: usize,
}

/// Render and persist manifests under `directory`.
///
/// Rendering happens before any filesystem mutation, so a render error
/// never leaves a partial artifact behind.
pub fn write_manifests(directory: &Path, manifests: &[BuildManifest]) -> Result<WriteReport> {
    let mut report = WriteReport::default();

    for manifest in manifests {
        let path = directory.join(manifest.artifact_path());
        if path.is_file() {
            debug!(path = %path.display(), "manifest already materialized, skipping");
            report.skipped += 1;
            continue;
        }

        let contents = render(manifest)?;
        write_atomic(&path, contents.as_bytes())?;
        report.written += 1;
    }

    info!(
        written = report.written,
        skipped = report.skipped,
        "wrote new manifests"
    );
    Ok(report)
}

/// Write content atomically: temp file in the target directory, an
/// advisory lock while writing, then rename into place.
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file in the same directory keeps the rename on one filesystem.
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;
    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;
    fs2::FileExt::unlock(&temp_file).map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use forge_core::{NukeVersion, OperatingSystem, ReleaseDescriptor, Resolver};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn manifest(os: OperatingSystem, major: u32, minor: u32) -> BuildManifest {
        let resolver = Resolver::default()
            .with_build_date(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
        resolver
            .resolve(&ReleaseDescriptor {
                operating_system: os,
                version: NukeVersion::new(major, minor),
                source_url: format!(
                    "https://host/Nuke{major}.{minor}v2-{}-x86_64.tgz",
                    os.as_str()
                ),
            })
            .unwrap()
    }

    #[test]
    fn writes_manifest_at_canonical_path() {
        let dir = TempDir::new().unwrap();
        let manifests = vec![manifest(OperatingSystem::Linux, 15, 0)];

        let report = write_manifests(dir.path(), &manifests).unwrap();
        assert_eq!(report, WriteReport { written: 1, skipped: 0 });

        let path = dir.path().join("manifests/15.0/linux/Manifest");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("FROM rockylinux:8"));
    }

    #[test]
    fn rerun_with_same_manifest_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let manifests = vec![manifest(OperatingSystem::Linux, 15, 0)];

        write_manifests(dir.path(), &manifests).unwrap();
        let report = write_manifests(dir.path(), &manifests).unwrap();
        assert_eq!(report, WriteReport { written: 0, skipped: 1 });
    }

    #[test]
    fn existing_artifact_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifests/15.0/linux/Manifest");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "handcrafted").unwrap();

        let manifests = vec![manifest(OperatingSystem::Linux, 15, 0)];
        let report = write_manifests(dir.path(), &manifests).unwrap();

        assert_eq!(report, WriteReport { written: 0, skipped: 1 });
        assert_eq!(fs::read_to_string(&path).unwrap(), "handcrafted");
    }

    #[test]
    fn new_version_adds_exactly_one_artifact() {
        let dir = TempDir::new().unwrap();
        write_manifests(dir.path(), &[manifest(OperatingSystem::Linux, 15, 0)]).unwrap();

        let batch = vec![
            manifest(OperatingSystem::Linux, 15, 0),
            manifest(OperatingSystem::Linux, 15, 1),
        ];
        let report = write_manifests(dir.path(), &batch).unwrap();
        assert_eq!(report, WriteReport { written: 1, skipped: 1 });
        assert!(dir.path().join("manifests/15.1/linux/Manifest").is_file());
    }

    #[test]
    fn one_file_per_target_pair() {
        let dir = TempDir::new().unwrap();
        let batch = vec![
            manifest(OperatingSystem::Linux, 15, 0),
            manifest(OperatingSystem::Windows, 15, 0),
            manifest(OperatingSystem::MacOsArm, 15, 0),
        ];
        write_manifests(dir.path(), &batch).unwrap();

        assert!(dir.path().join("manifests/15.0/linux/Manifest").is_file());
        assert!(dir.path().join("manifests/15.0/windows/Manifest").is_file());
        assert!(dir.path().join("manifests/15.0/macos-arm/Manifest").is_file());
    }
}
