//! Upstream release catalog model and fetching

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};

/// Default location of the published Nuke release catalog.
pub const DEFAULT_CATALOG_URL: &str = "https://codeberg.org/gillesvink/NukeVersionParser\
                                       /raw/branch/main/nuke-minor-releases.json";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// The upstream catalog: major-version group labels mapping to raw
/// release tokens (`"15.0v2"`) mapping to release data.
///
/// `BTreeMap` keeps batch iteration order stable across runs.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseCatalog(pub BTreeMap<String, BTreeMap<String, ReleaseData>>);

/// Data published for a single release.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseData {
    /// Installer URL per platform key; absent or null means the
    /// release was not published for that platform.
    #[serde(default)]
    pub installer: BTreeMap<String, Option<String>>,
}

impl ReleaseCatalog {
    /// Flatten the major-version grouping into (token, release) pairs.
    pub fn releases(&self) -> impl Iterator<Item = (&str, &ReleaseData)> {
        self.0
            .values()
            .flat_map(|group| group.iter().map(|(token, data)| (token.as_str(), data)))
    }
}

/// Fetch and decode the release catalog.
///
/// Any non-success response is fatal for the whole run; transient
/// network failures surface to the operator instead of being retried.
pub fn fetch_release_catalog(url: &str) -> Result<ReleaseCatalog> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let response = client.get(url).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::SourceStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let catalog: ReleaseCatalog = response.json()?;
    info!(url, "fetched release catalog");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nested_catalog_shape() {
        let raw = r#"{
            "15": {
                "15.0v2": {
                    "installer": {
                        "linux_x86_64": "https://host/Nuke15.0v2-linux-x86_64.tgz",
                        "windows_x86_64": "https://host/Nuke15.0v2-windows-x86_64.zip",
                        "mac_x86_64": null
                    }
                }
            },
            "14": {
                "14.1v3": { "installer": {} }
            }
        }"#;
        let catalog: ReleaseCatalog = serde_json::from_str(raw).unwrap();

        let releases: Vec<(&str, &ReleaseData)> = catalog.releases().collect();
        assert_eq!(releases.len(), 2);

        let (token, data) = releases
            .iter()
            .find(|(token, _)| *token == "15.0v2")
            .unwrap();
        assert_eq!(*token, "15.0v2");
        assert_eq!(
            data.installer.get("linux_x86_64"),
            Some(&Some(
                "https://host/Nuke15.0v2-linux-x86_64.tgz".to_string()
            ))
        );
        assert_eq!(data.installer.get("mac_x86_64"), Some(&None));
    }

    #[test]
    fn missing_installer_defaults_to_empty() {
        let raw = r#"{ "15": { "15.1v1": {} } }"#;
        let catalog: ReleaseCatalog = serde_json::from_str(raw).unwrap();
        let (_, data) = catalog.releases().next().unwrap();
        assert!(data.installer.is_empty());
    }
}
