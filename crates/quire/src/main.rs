//! Quire CLI - Documentation site generator.
//!
//! Provides commands for:
//! - `list`: Print the prepared routes
//! - `validate`: Check content files for structural errors
//! - `build`: Render the site to static HTML
//! - `dev`: Build, then rebuild whenever content changes
//!
//! Every command is supplied by a plugin declared in `quire.toml`.

mod commands;
mod error;
mod output;
mod plugins;

use clap::{Parser, Subcommand};
use quire_core::Capability;
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, ReportArgs};
use output::Output;

/// Quire - Documentation site generator.
#[derive(Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every route of the prepared site.
    List(ReportArgs),
    /// Validate content files.
    Validate(ReportArgs),
    /// Render the site to static HTML.
    Build(BuildArgs),
    /// Build the site and rebuild on every content change.
    Dev(BuildArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::List(args) | Self::Validate(args) => args.common.verbose,
            Self::Build(args) | Self::Dev(args) => args.common.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::List(args) => args.execute(Capability::List),
        Commands::Validate(args) => args.execute(Capability::Validate),
        Commands::Build(args) => args.execute(Capability::Build),
        Commands::Dev(args) => args.execute(Capability::Dev),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
