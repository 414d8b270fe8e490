//! subtrack - Subtitle Track Editor
//!
//! # Usage
//!
//! ```bash
//! subtrack inspect -i movie.mkv
//! subtrack add -i movie.mkv -s english.srt -o movie.en.mkv --language eng --default
//! subtrack export -i movie.mkv -o edited.mkv --plan plan.toml
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use subtrack_cli::adapters::{TomlConfigAdapter, TracingLogAdapter};
use subtrack_cli::app::container::DefaultAppContainer;
use subtrack_cli::cli::{commands, Cli};
use subtrack_cli::config_initialization::initialize_configuration_hierarchy;

/// Main entry point for the subtrack CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config = TomlConfigAdapter::new();
    let settings = initialize_configuration_hierarchy(&config, &cli.overrides())
        .await
        .context("Failed to load configuration")?;

    TracingLogAdapter::init(settings.log_level, settings.json_logs)?;
    info!("Starting subtrack");
    debug!(
        ffmpeg = %settings.ffmpeg_path.display(),
        ffprobe = %settings.ffprobe_path.display(),
        "Using external tools"
    );

    let container = DefaultAppContainer::new(settings);
    commands::run(&container, cli.command).await?;

    info!("subtrack completed successfully");
    Ok(())
}
