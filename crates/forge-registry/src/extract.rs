//! Extracting table rows from registry data

use forge_core::NukeVersion;
use tracing::info;

use crate::client::{ImageConfig, ImageManifest, Registry};
use crate::error::{Error, Result};
use crate::tags::filter_tags;

const BYTES_PER_GB: f64 = (1024 * 1024 * 1024) as f64;

/// One row of the published-image table.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedImage {
    /// The floating `latest` tag (recommended for consumers).
    pub tag: String,
    /// The numbered tag the latest tag currently points at.
    pub locked_tag: String,
    pub nuke_version: NukeVersion,
    pub target_os: String,
    pub upstream_image: String,
    pub date_added: String,
    /// Sum of layer sizes, in GB rounded to three decimals.
    pub size_gb: f64,
}

impl PublishedImage {
    /// Build a table row from one tag's manifest and config blob.
    pub fn from_parts(
        manifest: &ImageManifest,
        config: &ImageConfig,
        tag: &str,
        all_tags: &[String],
    ) -> Result<Self> {
        let size_gb = layer_size_gb(manifest, tag)?;
        let locked_tag = locked_tag_for(all_tags, tag)?;

        let label = |name: &str| {
            config
                .config
                .labels
                .get(name)
                .cloned()
                .ok_or_else(|| Error::MissingLabel {
                    tag: tag.to_string(),
                    name: name.to_string(),
                })
        };

        let raw_version = label("com.nukeforge.nuke_version")?;
        let nuke_version: NukeVersion =
            raw_version.parse().map_err(|err: forge_core::Error| {
                Error::InvalidLabel {
                    tag: tag.to_string(),
                    name: "com.nukeforge.nuke_version".to_string(),
                    message: err.to_string(),
                }
            })?;

        Ok(Self {
            tag: tag.to_string(),
            locked_tag,
            nuke_version,
            target_os: label("com.nukeforge.operating_system")?,
            upstream_image: label("com.nukeforge.based_on")?,
            date_added: label("org.opencontainers.image.created")?,
            size_gb,
        })
    }
}

/// Retrieve every published image worth listing: filter the tag set,
/// then resolve manifest, config and labels for each `latest` tag.
pub fn published_images(registry: &Registry) -> Result<Vec<PublishedImage>> {
    let all_tags = filter_tags(&registry.tags()?);

    let mut images = Vec::new();
    for tag in all_tags.iter().filter(|tag| tag.ends_with("latest")) {
        let manifest = registry.manifest(tag)?;
        let config = registry.config(&manifest)?;
        images.push(PublishedImage::from_parts(
            &manifest, &config, tag, &all_tags,
        )?);
        info!(tag, "processed published image");
    }
    Ok(images)
}

fn layer_size_gb(manifest: &ImageManifest, tag: &str) -> Result<f64> {
    let total_bytes: u64 = manifest.layers.iter().map(|layer| layer.size).sum();
    if total_bytes == 0 {
        return Err(Error::ZeroSize {
            tag: tag.to_string(),
        });
    }
    let gigabytes = total_bytes as f64 / BYTES_PER_GB;
    Ok((gigabytes * 1000.0).round() / 1000.0)
}

/// The numbered tag sharing the latest tag's platform prefix. The
/// prefix must match exactly; `macos` and `macos-arm` are distinct
/// platforms even though one is a prefix of the other.
fn locked_tag_for(tags: &[String], target_tag: &str) -> Result<String> {
    let platform = target_tag.strip_suffix("-latest").unwrap_or(target_tag);
    tags.iter()
        .filter(|tag| !tag.ends_with("latest"))
        .find(|tag| {
            tag.rsplit_once('-')
                .is_some_and(|(candidate, _)| candidate == platform)
        })
        .cloned()
        .ok_or_else(|| Error::NoLockedTag {
            tag: target_tag.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn manifest(layer_sizes: &[u64]) -> ImageManifest {
        let raw = serde_json::json!({
            "config": { "digest": "sha256:cfg", "size": 100 },
            "layers": layer_sizes
                .iter()
                .map(|size| serde_json::json!({ "digest": "sha256:layer", "size": size }))
                .collect::<Vec<_>>(),
        });
        serde_json::from_value(raw).unwrap()
    }

    fn config() -> ImageConfig {
        serde_json::from_value(serde_json::json!({
            "config": {
                "Labels": {
                    "com.nukeforge.nuke_version": "15.0",
                    "com.nukeforge.operating_system": "linux",
                    "com.nukeforge.based_on": "rockylinux:8",
                    "org.opencontainers.image.created": "2026-01-15"
                }
            }
        }))
        .unwrap()
    }

    fn tags() -> Vec<String> {
        vec![
            "15.0-linux-latest".to_string(),
            "15.0-linux-1.2".to_string(),
        ]
    }

    #[test]
    fn builds_row_from_labels() {
        let image = PublishedImage::from_parts(
            &manifest(&[1_073_741_824]),
            &config(),
            "15.0-linux-latest",
            &tags(),
        )
        .unwrap();

        assert_eq!(image.tag, "15.0-linux-latest");
        assert_eq!(image.locked_tag, "15.0-linux-1.2");
        assert_eq!(image.nuke_version, NukeVersion::new(15, 0));
        assert_eq!(image.target_os, "linux");
        assert_eq!(image.upstream_image, "rockylinux:8");
        assert_eq!(image.date_added, "2026-01-15");
        assert_eq!(image.size_gb, 1.0);
    }

    #[test]
    fn size_sums_layers_and_rounds_to_three_decimals() {
        let image = PublishedImage::from_parts(
            &manifest(&[1_073_741_824, 536_870_912, 123_456]),
            &config(),
            "15.0-linux-latest",
            &tags(),
        )
        .unwrap();
        assert_eq!(image.size_gb, 1.5);
    }

    #[test]
    fn zero_byte_image_is_rejected() {
        let err = PublishedImage::from_parts(
            &manifest(&[]),
            &config(),
            "15.0-linux-latest",
            &tags(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ZeroSize { .. }));
    }

    #[test]
    fn missing_label_is_reported_by_name() {
        let bare: ImageConfig =
            serde_json::from_value(serde_json::json!({ "config": {} })).unwrap();
        let err = PublishedImage::from_parts(
            &manifest(&[1024]),
            &bare,
            "15.0-linux-latest",
            &tags(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingLabel { ref name, .. } if name == "com.nukeforge.nuke_version"
        ));
    }

    #[test]
    fn locked_tag_distinguishes_prefix_sharing_platforms() {
        let tags = vec![
            "15.0-macos-latest".to_string(),
            "15.0-macos-1.2".to_string(),
            "15.0-macos-arm-latest".to_string(),
            "15.0-macos-arm-1.1".to_string(),
        ];

        let arm = PublishedImage::from_parts(
            &manifest(&[1024]),
            &config(),
            "15.0-macos-arm-latest",
            &tags,
        )
        .unwrap();
        assert_eq!(arm.locked_tag, "15.0-macos-arm-1.1");

        let intel = PublishedImage::from_parts(
            &manifest(&[1024]),
            &config(),
            "15.0-macos-latest",
            &tags,
        )
        .unwrap();
        assert_eq!(intel.locked_tag, "15.0-macos-1.2");
    }

    #[test]
    fn missing_locked_tag_is_fatal() {
        let err = PublishedImage::from_parts(
            &manifest(&[1024]),
            &config(),
            "15.0-linux-latest",
            &["15.0-linux-latest".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, Error::NoLockedTag { .. }));
    }
}
