//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Daktela extractor CLI
#[derive(Parser, Debug)]
#[command(name = "daktela-extractor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true, default_value = "config.json")]
    pub config: PathBuf,

    /// Output directory for CSV tables and manifests
    #[arg(short, long, global = true, default_value = "out/tables")]
    pub output: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test credentials against the configured instance
    Check,

    /// List the built-in table names
    Tables,

    /// Run the extraction
    Run {
        /// Tables to extract (comma-separated, overrides the config)
        #[arg(long)]
        tables: Option<String>,

        /// Force incremental-append loads
        #[arg(long)]
        incremental: bool,
    },
}
