//! GHCR v2 API client

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

const GHCR_BASE: &str = "https://ghcr.io/v2";
const MANIFEST_ACCEPT: &str = "application/vnd.oci.image.manifest.v1+json";
const FETCH_TIMEOUT: Duration = Duration::from_secs(3);

/// Environment variable the registry token is read from.
pub const TOKEN_ENV: &str = "GHCR_TOKEN";

/// Tag listing response.
#[derive(Debug, Clone, Deserialize)]
pub struct TagList {
    pub tags: Vec<String>,
}

/// A content descriptor in an image manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct Descriptor {
    pub digest: String,
    pub size: u64,
}

/// The parts of an OCI image manifest the table needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageManifest {
    pub config: Descriptor,
    pub layers: Vec<Descriptor>,
}

/// The parts of an image config blob the table needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    pub config: ConfigSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    #[serde(rename = "Labels", default)]
    pub labels: BTreeMap<String, String>,
}

/// Authenticated client for one repository on GHCR.
#[derive(Debug)]
pub struct Registry {
    http: reqwest::blocking::Client,
    repository: String,
    token: String,
}

impl Registry {
    pub fn new(repository: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: reqwest::blocking::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()?,
            repository: repository.into(),
            token: token.into(),
        })
    }

    /// Build a client with the token from the `GHCR_TOKEN` environment.
    pub fn from_env(repository: impl Into<String>) -> Result<Self> {
        let token = std::env::var(TOKEN_ENV).map_err(|_| Error::MissingToken)?;
        Self::new(repository, token)
    }

    /// List every tag published for the repository.
    pub fn tags(&self) -> Result<Vec<String>> {
        let list: TagList = self.get("tags/list", None)?;
        debug!(count = list.tags.len(), "retrieved registry tags");
        Ok(list.tags)
    }

    /// Fetch the image manifest for a tag.
    pub fn manifest(&self, tag: &str) -> Result<ImageManifest> {
        self.get(&format!("manifests/{tag}"), Some(MANIFEST_ACCEPT))
    }

    /// Fetch the config blob an image manifest points at.
    pub fn config(&self, manifest: &ImageManifest) -> Result<ImageConfig> {
        self.get(&format!("blobs/{}", manifest.config.digest), None)
    }

    fn get<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        accept: Option<&str>,
    ) -> Result<T> {
        let url = format!("{GHCR_BASE}/{}/{resource}", self.repository);
        let mut request = self.http.get(&url).bearer_auth(&self.token);
        if let Some(accept) = accept {
            request = request.header(reqwest::header::ACCEPT, accept);
        }
        let response = request.send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::RegistryStatus {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_payload_decodes() {
        let raw = r#"{
            "schemaVersion": 2,
            "config": { "mediaType": "application/vnd.oci.image.config.v1+json",
                        "digest": "sha256:abc", "size": 1234 },
            "layers": [
                { "mediaType": "application/vnd.oci.image.layer.v1.tar+gzip",
                  "digest": "sha256:l1", "size": 1073741824 },
                { "mediaType": "application/vnd.oci.image.layer.v1.tar+gzip",
                  "digest": "sha256:l2", "size": 536870912 }
            ]
        }"#;
        let manifest: ImageManifest = serde_json::from_str(raw).unwrap();
        assert_eq!(manifest.config.digest, "sha256:abc");
        assert_eq!(manifest.layers.len(), 2);
        assert_eq!(manifest.layers[0].size, 1073741824);
    }

    #[test]
    fn config_blob_labels_decode() {
        let raw = r#"{
            "architecture": "amd64",
            "config": {
                "Labels": {
                    "com.nukeforge.nuke_version": "15.0",
                    "com.nukeforge.operating_system": "linux"
                }
            }
        }"#;
        let config: ImageConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(
            config.config.labels.get("com.nukeforge.nuke_version"),
            Some(&"15.0".to_string())
        );
    }

    #[test]
    fn missing_labels_default_to_empty() {
        let raw = r#"{ "config": {} }"#;
        let config: ImageConfig = serde_json::from_str(raw).unwrap();
        assert!(config.config.labels.is_empty());
    }
}
