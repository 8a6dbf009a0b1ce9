//! platecache CLI entry point
//!
//! Dispatches to subcommands.

use clap::Parser;
use console::style;
use platecache::cli::{Cli, Commands};
use platecache::config::ConfigManager;
use platecache::error::PlateResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> PlateResult<()> {
    let cli = Cli::parse();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    let mut config = config_manager.load().await?;

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let verbose = if config.general.verbose {
        cli.verbose.max(1)
    } else {
        cli.verbose
    };
    let filter = match verbose {
        0 => EnvFilter::new("platecache=warn"),
        1 => EnvFilter::new("platecache=info"),
        _ => EnvFilter::new("platecache=debug"),
    };

    if config.general.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .without_time()
            .init();
    }

    debug!("Using config {}", config_manager.path().display());

    if let Some(dir) = cli.cache_dir {
        debug!("Cache directory overridden: {}", dir.display());
        config.cache.dir = Some(dir);
    }

    match cli.command {
        Commands::Resolve(args) => platecache::cli::commands::resolve(args, &config).await,
        Commands::Prefetch(args) => platecache::cli::commands::prefetch(args, &config).await,
        Commands::Invalidate(args) => platecache::cli::commands::invalidate(args, &config).await,
        Commands::Clear(args) => platecache::cli::commands::clear(args, &config).await,
        Commands::Status => platecache::cli::commands::status(&config, &config_manager).await,
        Commands::Config(args) => {
            platecache::cli::commands::config(args, &config, &config_manager).await
        }
    }
}
