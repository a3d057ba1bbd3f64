//! Flotilla: keep one CI workflow file in sync across sibling repositories.
//!
//! # Usage
//!
//! ```text
//! flotilla sync [ROOT] [--dry-run] [--strict]
//! flotilla scan [ROOT] [--json]
//! flotilla render
//! flotilla diff [ROOT]
//! ```
//!
//! `ROOT` defaults to `..`. Every command accepts `--config <FILE>` and `-v`.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, render::RenderArgs, scan::ScanArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "flotilla",
    version,
    about = "Publish a generated workflow file to every repository under a directory",
    long_about = None,
)]
struct Cli {
    /// Settings file to use instead of ~/.flotilla/config.yaml.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the workflow and publish it on a fresh branch in every repository.
    Sync(SyncArgs),

    /// List discovered repositories and their version references.
    Scan(ScanArgs),

    /// Print the rendered workflow to stdout.
    Render(RenderArgs),

    /// Show a unified diff of what sync would write to each repository.
    Diff(DiffArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = commands::load_settings(cli.config.as_deref())?;
    match cli.command {
        Commands::Sync(args) => args.run(&settings),
        Commands::Scan(args) => args.run(&settings),
        Commands::Render(args) => args.run(&settings),
        Commands::Diff(args) => args.run(&settings),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
