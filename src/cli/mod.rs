//! CLI module for subtrack
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config_initialization::ConfigOverrides;

pub mod args;
pub mod commands;

/// Subtitle track editor
///
/// Inspects, extracts, adds, removes and re-flags subtitle tracks in video
/// containers by remuxing with ffmpeg. Streams are never re-encoded.
#[derive(Parser, Debug)]
#[command(name = "subtrack")]
#[command(about = "Inspect and edit subtitle tracks in video containers")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./subtrack.toml when present)
    #[arg(long, global = true, env = "SUBTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Replace existing output files even if the configuration says never
    #[arg(long, global = true)]
    pub overwrite: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Command-line values that take precedence over every other source
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            log_level: self.log_level.clone(),
            json_logs: self.json_logs,
            overwrite: self.overwrite,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show container information and subtitle tracks
    Inspect(args::InspectArgs),
    /// Write one subtitle track to a standalone file
    Extract(args::ExtractArgs),
    /// Add a subtitle file as a new track
    Add(args::AddArgs),
    /// Remove a subtitle track
    Remove(args::RemoveArgs),
    /// Make a subtitle track the default one
    SetDefault(args::SetDefaultArgs),
    /// Apply a plan of queued edits and write the result
    Export(args::ExportArgs),
}
