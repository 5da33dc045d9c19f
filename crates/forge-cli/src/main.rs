//! nukeforge CLI
//!
//! Generates Dockerfiles for building Nuke plugins and maintains the
//! published-image table.

mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use commands::GenerateOptions;
use config::FileConfig;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = FileConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Generate {
            output,
            source,
            eol_floor,
            abort_on_error,
        }) => {
            let options =
                GenerateOptions::resolve(&config, output, source, eol_floor, abort_on_error)?;
            commands::run_generate(&options)
        }
        Some(Commands::UpdateTable { readme, repository }) => {
            commands::run_update_table(&config, readme, repository)
        }
        None => {
            println!("{} Nuke build-image generator", "nukeforge".green().bold());
            println!();
            println!("Run {} for available commands.", "nukeforge --help".cyan());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    // A second init (from tests) is harmless.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
