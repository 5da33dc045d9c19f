//! Optional nukeforge.toml configuration
//!
//! Flags win over the config file, the config file wins over built-in
//! defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CliError, Result};

/// Default file name looked up in the working directory.
pub const CONFIG_FILE: &str = "nukeforge.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub generate: GenerateConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateConfig {
    pub output: Option<PathBuf>,
    pub source: Option<String>,
    pub eol_floor: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    pub repository: Option<String>,
    pub readme: Option<PathBuf>,
}

impl FileConfig {
    /// Load an explicit config path, or `nukeforge.toml` from the
    /// working directory when present. No file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let implicit = PathBuf::from(CONFIG_FILE);
                if !implicit.is_file() {
                    return Ok(Self::default());
                }
                implicit
            }
        };

        let raw = fs::read_to_string(&path)
            .map_err(|e| CliError::user(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&raw)
            .map_err(|e| CliError::user(format!("invalid config {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn full_config_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nukeforge.toml");
        fs::write(
            &path,
            r#"
[generate]
output = "/srv/manifests"
source = "https://host/releases.json"
eol_floor = 14

[registry]
repository = "user/nukeforge"
readme = "README.md"
"#,
        )
        .unwrap();

        let config = FileConfig::load(Some(&path)).unwrap();
        assert_eq!(config.generate.output, Some(PathBuf::from("/srv/manifests")));
        assert_eq!(config.generate.eol_floor, Some(14));
        assert_eq!(
            config.registry.repository,
            Some("user/nukeforge".to_string())
        );
    }

    #[test]
    fn partial_config_leaves_rest_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nukeforge.toml");
        fs::write(&path, "[generate]\neol_floor = 15\n").unwrap();

        let config = FileConfig::load(Some(&path)).unwrap();
        assert_eq!(config.generate.eol_floor, Some(15));
        assert!(config.generate.output.is_none());
        assert!(config.registry.repository.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nukeforge.toml");
        fs::write(&path, "[generate]\ntypo_key = true\n").unwrap();
        assert!(FileConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(FileConfig::load(Some(Path::new("/nonexistent/nukeforge.toml"))).is_err());
    }
}
