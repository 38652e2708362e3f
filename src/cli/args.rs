//! Command-line argument parsing for LKG Loader
//!
//! This module defines the CLI structure using clap derive macros: loading
//! the dataset, inspecting and clearing the last-known-good copy, and
//! hashing payload files for manifests.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// LKG Loader - fetch a verified dataset with last-known-good fallback
#[derive(Parser, Debug)]
#[command(
    name = "lkg_loader",
    version,
    about = "Load a manifest-described CSV dataset with last-known-good fallback",
    long_about = "Fetches a manifest, schema and CSV payload, verifies the payload digest and
validates its columns. When anything on the network path fails, the last successfully
validated copy is served from the local cache instead."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cache directory path
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Manifest URL (overrides config and environment)
    #[arg(long, global = true, value_name = "URL")]
    pub manifest_url: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the dataset once and show the result
    Load(LoadArgs),

    /// Inspect or clear the last-known-good copy
    Cache(CacheArgs),

    /// Print the SHA-256 digest of a local file
    Hash(HashArgs),
}

/// Arguments for the load command
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Print `{rows, meta}` as JSON instead of a preview
    #[arg(long)]
    pub json: bool,

    /// Maximum number of rows to print
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for cache management
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache management actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    /// Show the cache location and the stored provenance
    Info,

    /// Remove the last-known-good copy
    Clear,
}

/// Arguments for the hash command
#[derive(Args, Debug, Clone)]
pub struct HashArgs {
    /// File whose text is hashed
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Logging level requested on the command line, if any
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}
