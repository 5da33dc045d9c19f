//! Dockerfile rendering
//!
//! Composes a resolved [`BuildManifest`] into the final text artifact,
//! in a fixed section order, substituting the `{toolset}`, `{filename}`
//! and `{url}` placeholders into the command text. Rendering is a pure
//! function of the manifest: identical manifests render byte-identical
//! text, which is what makes the writer's skip-if-exists deduplication
//! meaningful.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{BUILD_DIR, LABEL_PREFIX, NUKE_INSTALL_DIR, PROJECT_URL, TOOLCHAIN_DIR};
use crate::error::{Error, Result};
use crate::os::OperatingSystem;
use crate::resolver::BuildManifest;

/// Placeholder grammar: a braced lowercase identifier. Shell parameter
/// expansions like `${BIN}` stay untouched (uppercase).
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

/// Substitute placeholders in `text` from `values`.
///
/// A placeholder with no matching value is a fatal
/// [`Error::UnresolvedPlaceholder`]; partially substituted output is
/// never returned.
pub fn substitute(text: &str, values: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for captures in PLACEHOLDER.captures_iter(text) {
        let matched = captures.get(0).expect("capture 0 always present");
        let name = &captures[1];
        let value = values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| Error::UnresolvedPlaceholder {
                name: name.to_string(),
            })?;
        out.push_str(&text[last..matched.start()]);
        out.push_str(value);
        last = matched.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// The source URL's path basename with its final extension stripped;
/// the `{filename}` substitution value.
fn source_filename(url: &str) -> Result<String> {
    let basename = url.rsplit('/').next().unwrap_or_default();
    let stem = basename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(basename);
    if stem.is_empty() {
        return Err(Error::UnresolvedPlaceholder {
            name: "filename".to_string(),
        });
    }
    Ok(stem.to_string())
}

/// Render a manifest to its Dockerfile text.
pub fn render(manifest: &BuildManifest) -> Result<String> {
    let filename = source_filename(&manifest.source_url)?;
    let values: [(&str, &str); 3] = [
        ("toolset", &manifest.toolchain),
        ("filename", &filename),
        ("url", &manifest.source_url),
    ];

    let mut sections = vec![
        format!("FROM {}", manifest.base_image),
        labels(manifest),
        args(manifest),
        copy(manifest),
    ];

    let run_blocks: Vec<String> = manifest
        .commands
        .iter()
        .map(|block| substitute(&block.to_run_directive(), &values))
        .collect::<Result<_>>()?;
    if !run_blocks.is_empty() {
        sections.push(run_blocks.join("\n\n"));
    }

    sections.push(format!("WORKDIR {BUILD_DIR}"));
    sections.push(substitute(
        &manifest.environment.to_env_directive(),
        &values,
    )?);

    // Linux images activate the software-collections toolchain at
    // runtime; cross-compile targets configure theirs via ENV only.
    if manifest.operating_system == OperatingSystem::Linux {
        sections.push(substitute(
            "ENTRYPOINT [\"scl\", \"enable\", \"{toolset}\", \"--\", \"/bin/bash\"]",
            &values,
        )?);
    }

    let mut rendered = sections.join("\n\n");
    rendered.push('\n');
    Ok(rendered)
}

fn labels(manifest: &BuildManifest) -> String {
    let created = manifest.created.format("%Y-%m-%d");
    let lines = [
        "LABEL 'org.opencontainers.version'=1.0".to_string(),
        format!("LABEL 'org.opencontainers.image.created'='{created}'"),
        "LABEL 'org.opencontainers.image.description'=\
         'Ready to use image for building Nuke plugins.'"
            .to_string(),
        "LABEL 'org.opencontainers.license'='MIT'".to_string(),
        format!("LABEL 'org.opencontainers.url'='{PROJECT_URL}'"),
        format!(
            "LABEL '{LABEL_PREFIX}.based_on'='{}'",
            manifest.base_image
        ),
        format!(
            "LABEL '{LABEL_PREFIX}.operating_system'='{}'",
            manifest.operating_system
        ),
        format!(
            "LABEL '{LABEL_PREFIX}.nuke_version'={}",
            manifest.version
        ),
        format!(
            "LABEL '{LABEL_PREFIX}.nuke_source'='{}'",
            manifest.source_url
        ),
    ];
    lines.join("\n")
}

fn args(manifest: &BuildManifest) -> String {
    let mut lines = vec!["ARG NUKE_SOURCE_FILES".to_string()];
    if manifest.operating_system == OperatingSystem::Windows {
        lines.push("ARG TOOLCHAIN".to_string());
    }
    lines.join("\n")
}

fn copy(manifest: &BuildManifest) -> String {
    let mut lines = vec![format!("COPY $NUKE_SOURCE_FILES {NUKE_INSTALL_DIR}")];
    if manifest.operating_system == OperatingSystem::Windows {
        lines.push(format!("COPY $TOOLCHAIN {TOOLCHAIN_DIR}/"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn substitutes_known_placeholders() {
        let out = substitute(
            "curl -o /tmp/{filename}.tgz {url}",
            &[("filename", "Nuke15.0v2"), ("url", "https://host/n.tgz")],
        )
        .unwrap();
        assert_eq!(out, "curl -o /tmp/Nuke15.0v2.tgz https://host/n.tgz");
    }

    #[test]
    fn unknown_placeholder_is_fatal() {
        let err = substitute("echo {mystery}", &[("toolset", "17")]).unwrap_err();
        assert_eq!(
            err,
            Error::UnresolvedPlaceholder {
                name: "mystery".to_string()
            }
        );
    }

    #[test]
    fn shell_parameter_expansion_is_not_a_placeholder() {
        let out = substitute("echo \"export BIN=${BIN}\"", &[]).unwrap();
        assert_eq!(out, "echo \"export BIN=${BIN}\"");
    }

    #[rstest]
    #[case("https://host/Nuke15.0v2-linux-x86_64.tgz", "Nuke15.0v2-linux-x86_64")]
    #[case("https://host/dir/archive.tar", "archive")]
    #[case("https://host/noextension", "noextension")]
    fn filename_strips_final_extension(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(source_filename(url).unwrap(), expected);
    }

    #[test]
    fn filename_from_empty_basename_is_fatal() {
        assert!(source_filename("https://host/").is_err());
    }

    #[test]
    fn stray_environment_placeholder_fails_rendering() {
        use crate::commands::EnvironmentSet;
        use crate::os::UpstreamImage;
        use crate::version::NukeVersion;
        use chrono::NaiveDate;

        let mut environment = EnvironmentSet::new();
        environment.push("SDK_ROOT", "{sdk_root}");
        let manifest = BuildManifest {
            operating_system: OperatingSystem::Windows,
            version: NukeVersion::new(15, 0),
            source_url: "https://host/Nuke15.0v2-windows-x86_64.zip".to_string(),
            base_image: UpstreamImage::DebianBookworm,
            toolchain: "17".to_string(),
            commands: Vec::new(),
            environment,
            created: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        };

        let err = render(&manifest).unwrap_err();
        assert_eq!(
            err,
            Error::UnresolvedPlaceholder {
                name: "sdk_root".to_string()
            }
        );
    }
}
