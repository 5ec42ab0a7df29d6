mod commands;

use bandcamp_link_scraper::ScraperConfig;
use clap::Parser;
use commands::{execute_command, Commands};
use std::path::PathBuf;

/// Bandcamp album playlist scraper and downloader
#[derive(Parser)]
#[command(
    name = "bandcamp-link-scraper",
    about = "Bandcamp album playlist scraper and downloader",
    long_about = None
)]
struct Cli {
    /// Show detailed debug information
    #[arg(long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match ScraperConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = execute_command(args.command, config).await {
        eprintln!("❌ Command failed: {e}");
        std::process::exit(1);
    }
}
