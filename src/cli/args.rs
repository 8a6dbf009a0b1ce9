//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// platecache - on-device image cache for meal photos
///
/// Resolves remote image URLs to local files, downloading each once and
/// falling back to a placeholder for images that cannot be fetched.
#[derive(Parser, Debug)]
#[command(name = "platecache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PLATECACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache directory (overrides the config file)
    #[arg(long, global = true, env = "PLATECACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve image URLs to something renderable
    Resolve(ResolveArgs),

    /// Download images into the cache ahead of time
    Prefetch(PrefetchArgs),

    /// Drop cached images so they are fetched again
    Invalidate(InvalidateArgs),

    /// Remove every cached image
    Clear(ClearArgs),

    /// Show cache location and disk usage
    Status,

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Image URLs
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Placeholder to return for unavailable images
    #[arg(short, long)]
    pub placeholder: Option<String>,

    /// Request smaller variants from known CDNs
    #[arg(long)]
    pub optimize: bool,

    /// Skip the HEAD check before downloading
    #[arg(long)]
    pub no_probe: bool,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the prefetch command
#[derive(Parser, Debug)]
pub struct PrefetchArgs {
    /// Image URLs
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Request smaller variants from known CDNs
    #[arg(long)]
    pub optimize: bool,
}

/// Arguments for the invalidate command
#[derive(Parser, Debug)]
pub struct InvalidateArgs {
    /// Image URLs
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Match entries cached with --optimize
    #[arg(long)]
    pub optimize: bool,
}

/// Arguments for the clear command
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for resolve results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Display URI only, one per line
    Plain,
}
