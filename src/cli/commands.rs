//! Command implementations

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::app::container::AppContainer;
use crate::app::inspect_interactor::{InspectRequest, ReportFormat};
use crate::app::session::BatchOutcome;
use crate::cli::args::{AddArgs, ExportArgs, ExtractArgs, InspectArgs, RemoveArgs, SetDefaultArgs};
use crate::cli::Commands;
use crate::domain::model::{OverwritePolicy, PendingOperation, SubtitleTrack};
use crate::domain::rules::RemuxPlanner;

/// Operations read from a plan file
#[derive(Debug, Default, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub operations: Vec<PendingOperation>,
}

impl Plan {
    /// Parse a plan, picking the format from the file extension
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let plan = match extension.as_str() {
            "toml" => toml::from_str(content).context("Invalid TOML plan")?,
            "json" => serde_json::from_str(content).context("Invalid JSON plan")?,
            "yaml" | "yml" => serde_yaml::from_str(content).context("Invalid YAML plan")?,
            other => bail!(
                "Unsupported plan format '{}': use .toml, .json or .yaml",
                other
            ),
        };
        Ok(plan)
    }

    /// Read and parse a plan file
    pub async fn load(path: &str) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read plan file: {}", path))?;
        Self::parse(Path::new(path), &content)
    }
}

/// Dispatch a parsed command
pub async fn run(container: &dyn AppContainer, command: Commands) -> Result<()> {
    match command {
        Commands::Inspect(args) => inspect(container, args).await,
        Commands::Extract(args) => extract(container, args).await,
        Commands::Add(args) => add(container, args).await,
        Commands::Remove(args) => remove(container, args).await,
        Commands::SetDefault(args) => set_default(container, args).await,
        Commands::Export(args) => export(container, args).await,
    }
}

/// Execute the inspect command
pub async fn inspect(container: &dyn AppContainer, args: InspectArgs) -> Result<()> {
    let format = ReportFormat::parse(&args.format)?;
    let response = container
        .inspect_interactor()
        .execute(InspectRequest::new(args.input.clone(), format))
        .await
        .with_context(|| format!("Failed to inspect {}", args.input))?;

    print!("{}", response.summary);
    if format != ReportFormat::Text && !response.summary.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Execute the extract command
pub async fn extract(container: &dyn AppContainer, args: ExtractArgs) -> Result<()> {
    let output = match args.output {
        Some(output) => output,
        None => {
            let session = container
                .inspect_interactor()
                .open_session(&args.input)
                .await
                .with_context(|| format!("Failed to load {}", args.input))?;
            let track = session.tracks().get(args.track).with_context(|| {
                format!(
                    "Subtitle track {} does not exist ({} subtitle tracks)",
                    args.track,
                    session.tracks().len()
                )
            })?;
            default_extract_path(&args.input, track)
        }
    };

    let report = container
        .edit_interactor()
        .extract(&args.input, args.track, &output)
        .await
        .with_context(|| format!("Failed to extract subtitle track {}", args.track))?;

    info!(output = %report.output, "Subtitle extracted");
    println!("Extracted subtitle track {} to {}", args.track, report.output);
    Ok(())
}

/// Execute the add command
pub async fn add(container: &dyn AppContainer, args: AddArgs) -> Result<()> {
    let operation = PendingOperation::add(
        args.subtitle.clone(),
        args.language.as_deref(),
        args.title.as_deref(),
        args.default,
    );
    apply_single(container, &args.input, operation, &args.output).await
}

/// Execute the remove command
pub async fn remove(container: &dyn AppContainer, args: RemoveArgs) -> Result<()> {
    apply_single(
        container,
        &args.input,
        PendingOperation::remove(args.track),
        &args.output,
    )
    .await
}

/// Execute the set-default command
pub async fn set_default(container: &dyn AppContainer, args: SetDefaultArgs) -> Result<()> {
    apply_single(
        container,
        &args.input,
        PendingOperation::set_default(args.track),
        &args.output,
    )
    .await
}

/// Execute the export command
pub async fn export(container: &dyn AppContainer, args: ExportArgs) -> Result<()> {
    let plan = match &args.plan {
        Some(path) => Plan::load(path).await?,
        None => Plan::default(),
    };

    let mut session = container
        .inspect_interactor()
        .open_session(&args.input)
        .await
        .with_context(|| format!("Failed to load {}", args.input))?;

    RemuxPlanner::validate_paths(&args.input, &args.output)?;

    if plan.operations.is_empty() {
        if container.overwrite_policy() == OverwritePolicy::Never
            && container.fs_port().file_exists(&args.output).await?
        {
            bail!("Output file already exists: {}", args.output);
        }
        container
            .fs_port()
            .copy_file(&args.input, &args.output)
            .await
            .context("Failed to copy input to output")?;
        println!("No pending changes; copied {} to {}", args.input, args.output);
        return Ok(());
    }

    for operation in plan.operations {
        session.enqueue(operation);
    }

    println!("Applying {} change(s):", session.queue().len());
    for line in session.describe_queue() {
        println!("  - {}", line);
    }

    let workspace = container.new_workspace()?;
    let succeeded = container
        .batch_interactor()
        .execute_all(&mut session, &args.output, &workspace)
        .await;

    if !succeeded {
        match session.last_outcome() {
            Some(BatchOutcome::Failed { stage, error }) => {
                bail!("Export failed at step {}: {}", stage, error)
            }
            _ => bail!("Export failed"),
        }
    }

    println!("Saved {}", args.output);
    Ok(())
}

async fn apply_single(
    container: &dyn AppContainer,
    input: &str,
    operation: PendingOperation,
    output: &str,
) -> Result<()> {
    let report = container
        .edit_interactor()
        .apply(input, &operation, output)
        .await
        .with_context(|| format!("Failed to {}", operation.describe(&[]).to_lowercase()))?;

    info!(output = %report.output, "Edit applied");
    println!("Saved {}", report.output);
    Ok(())
}

/// `subtitle_<n>_<language>.srt` in the input's directory, n being 1-based
pub fn default_extract_path(input: &str, track: &SubtitleTrack) -> String {
    let file_name = format!(
        "subtitle_{}_{}.srt",
        track.position_in_list + 1,
        track.display_language()
    );
    match Path::new(input).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(file_name).to_string_lossy().to_string(),
        _ => file_name,
    }
}
