//! Command-line argument definitions

use clap::Args;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Output format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Subtitle track position (0-based, as listed by inspect)
    #[arg(short, long)]
    pub track: usize,

    /// Output subtitle file (default: subtitle_<n>_<language>.srt next to the input)
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the add command
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Subtitle file to add
    #[arg(short, long)]
    pub subtitle: String,

    /// Output video file path
    #[arg(short, long)]
    pub output: String,

    /// Language tag for the new track (e.g. eng)
    #[arg(long)]
    pub language: Option<String>,

    /// Title for the new track
    #[arg(long)]
    pub title: Option<String>,

    /// Make the new track the default subtitle
    #[arg(long)]
    pub default: bool,
}

/// Arguments for the remove command
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Subtitle track position to remove
    #[arg(short, long)]
    pub track: usize,

    /// Output video file path
    #[arg(short, long)]
    pub output: String,
}

/// Arguments for the set-default command
#[derive(Args, Debug)]
pub struct SetDefaultArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Subtitle track position to mark default
    #[arg(short, long)]
    pub track: usize,

    /// Output video file path
    #[arg(short, long)]
    pub output: String,
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Output video file path
    #[arg(short, long)]
    pub output: String,

    /// Plan file (TOML, JSON or YAML) listing operations; omitted means copy unchanged
    #[arg(long)]
    pub plan: Option<String>,
}
