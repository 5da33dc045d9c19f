//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// nukeforge - Generate and publish Nuke plugin build images
#[derive(Parser, Debug)]
#[command(name = "nukeforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a nukeforge.toml configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Generate build manifests for every published Nuke release
    ///
    /// Fetches the release catalog, resolves one manifest per
    /// (version, operating system) pair and writes the new ones under
    /// the output directory. Existing manifests are never rewritten.
    Generate {
        /// Directory to write manifests into
        #[arg(short, long, env = "DOCKERFILES_DIRECTORY")]
        output: Option<PathBuf>,

        /// Release catalog URL
        #[arg(long)]
        source: Option<String>,

        /// Skip Nuke majors below this end-of-life floor
        #[arg(long)]
        eol_floor: Option<u32>,

        /// Abort the whole run on the first malformed catalog record
        /// instead of skipping it
        #[arg(long)]
        abort_on_error: bool,
    },

    /// Update the published-image table in the README
    ///
    /// Queries the container registry for published image tags and
    /// rewrites the markdown table between the TABLE_START/TABLE_END
    /// markers.
    UpdateTable {
        /// Markdown document holding the table markers
        #[arg(short, long, env = "README_PATH")]
        readme: Option<PathBuf>,

        /// Registry repository (owner/name)
        #[arg(long)]
        repository: Option<String>,
    },
}
