//! Command implementations

use std::path::{Path, PathBuf};

use tracing::info;

use forge_collector::{
    CollectorConfig, ErrorPolicy, collect_descriptors, fetch_release_catalog, write_manifests,
};
use forge_collector::catalog::DEFAULT_CATALOG_URL;
use forge_core::{BuildManifest, Resolver};
use forge_registry::{Registry, published_images, to_markdown, update_table};

use crate::config::FileConfig;
use crate::error::{CliError, Result};

/// Resolved settings for a `generate` run.
#[derive(Debug)]
pub struct GenerateOptions {
    pub output: PathBuf,
    pub source: String,
    pub eol_floor: Option<u32>,
    pub abort_on_error: bool,
}

impl GenerateOptions {
    /// Layer flag values over the config file over defaults. The
    /// output directory has no default; somewhere explicit must say
    /// where manifests land.
    pub fn resolve(
        config: &FileConfig,
        output: Option<PathBuf>,
        source: Option<String>,
        eol_floor: Option<u32>,
        abort_on_error: bool,
    ) -> Result<Self> {
        let output = output
            .or_else(|| config.generate.output.clone())
            .ok_or_else(|| {
                CliError::user(
                    "no output directory set; pass --output, set DOCKERFILES_DIRECTORY \
                     or add [generate].output to nukeforge.toml",
                )
            })?;
        Ok(Self {
            output,
            source: source
                .or_else(|| config.generate.source.clone())
                .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
            eol_floor: eol_floor.or(config.generate.eol_floor),
            abort_on_error,
        })
    }
}

pub fn run_generate(options: &GenerateOptions) -> Result<()> {
    let mut collector_config = CollectorConfig::default();
    if let Some(floor) = options.eol_floor {
        collector_config.eol_floor = floor;
    }
    if options.abort_on_error {
        collector_config.on_error = ErrorPolicy::Abort;
    }

    let catalog = fetch_release_catalog(&options.source)?;
    let descriptors = collect_descriptors(&catalog, &collector_config)?;

    let resolver = Resolver::default();
    let manifests: Vec<BuildManifest> = descriptors
        .iter()
        .map(|descriptor| resolver.resolve(descriptor))
        .collect::<forge_core::Result<_>>()?;

    let report = write_manifests(&options.output, &manifests)?;
    info!(
        written = report.written,
        skipped = report.skipped,
        directory = %options.output.display(),
        "generate finished"
    );
    Ok(())
}

pub fn run_update_table(
    config: &FileConfig,
    readme: Option<PathBuf>,
    repository: Option<String>,
) -> Result<()> {
    let readme = readme
        .or_else(|| config.registry.readme.clone())
        .unwrap_or_else(|| PathBuf::from("README.md"));
    let repository = repository
        .or_else(|| config.registry.repository.clone())
        .unwrap_or_else(|| "user/nukeforge".to_string());

    let registry = Registry::from_env(repository)?;
    let images = published_images(&registry)?;
    update_table(Path::new(&readme), &to_markdown(&images))?;
    Ok(())
}
