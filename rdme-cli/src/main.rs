//! # rdme CLI
//!
//! Command-line driver for the rdme document transformation pipeline.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rdme")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (defaults are used when it does not exist)
    #[arg(long, default_value = "rdme.yml", env = "RDME_CONFIG")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform every document of a manifest and write the artifacts
    Build {
        /// Document manifest (JSON or YAML)
        #[arg(long)]
        manifest: PathBuf,

        /// Output directory
        #[arg(long, default_value = "out")]
        out: PathBuf,
    },

    /// Print the slug of every document in a manifest
    Slugs {
        /// Document manifest (JSON or YAML)
        #[arg(long)]
        manifest: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `slugs --json` output stays machine readable
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Build { manifest, out } => commands::build_docs(&cli.config, &manifest, &out),
        Commands::Slugs { manifest, json } => commands::print_slugs(&cli.config, &manifest, json),
    }
}
