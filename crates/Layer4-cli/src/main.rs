//! Luxoria CLI - Main entry point

mod cli;

use clap::{Parser, Subcommand};
use luxoria_foundation::{LogLevel, LuxoriaConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Luxoria - modular photo collection runtime
#[derive(Parser, Debug)]
#[command(name = "luxoria")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Load configuration from this file instead of the global/project config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging and bus tracing
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize the builtin modules and list their state
    Modules,
    /// Import a collection from a directory
    Import {
        /// Collection name
        name: String,
        /// Directory containing the images
        path: PathBuf,
    },
    /// List the available filter algorithms
    Filters,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => LuxoriaConfig::load_from(path)?,
        None => LuxoriaConfig::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {}", e);
            LuxoriaConfig::new()
        }),
    };
    if args.debug {
        config.bus.debug_mode = true;
        config.log.level = LogLevel::Debug;
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_for(config.log.level))),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
    tracing::debug!(?config, "Configuration loaded");

    match args.command {
        Command::Modules => cli::list_modules(&config).await,
        Command::Import { name, path } => cli::import_collection(&config, &name, path).await,
        Command::Filters => cli::list_filters(&config).await,
    }
}

/// LogLevel -> EnvFilter 지시어
fn filter_for(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warning => "warn",
        LogLevel::Error | LogLevel::Critical => "error",
    }
}
