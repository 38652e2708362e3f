//! LKG Loader CLI application
//!
//! Command-line interface for loading a manifest-described dataset with
//! last-known-good fallback.

use std::process;

use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use lkg_loader::cli::{handle_cache, handle_hash, handle_load, Cli, Commands};
use lkg_loader::config::AppConfig;
use lkg_loader::errors::Result;

#[tokio::main]
async fn main() {
    // Initialize program
    let result = run().await;

    // Handle any errors that occurred
    if let Err(e) = result {
        debug!("Command failed ({} error)", e.category());
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();

    let mut config = AppConfig::load(cli.global.config.clone()).await?;
    config.apply_cli_overrides(cli.global.manifest_url.clone(), cli.global.cache_dir.clone());

    init_logging(&cli, &config);

    info!("LKG Loader v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Load(args) => {
            info!("Executing load command");
            handle_load(args, &config, cli.global.quiet).await
        }
        Commands::Cache(args) => {
            info!("Executing cache command");
            handle_cache(args, &config).await
        }
        Commands::Hash(args) => {
            info!("Executing hash command");
            handle_hash(args).await
        }
    }
}

/// Initialize logging from CLI verbosity, falling back to the config file
fn init_logging(cli: &Cli, config: &AppConfig) {
    let level = cli
        .log_level()
        .map(|level| level.to_string().to_lowercase())
        .unwrap_or_else(|| config.logging.level.clone());

    let mut filter = EnvFilter::from_default_env();
    match format!("lkg_loader={}", level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring invalid log level {:?}: {}", level, e),
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
