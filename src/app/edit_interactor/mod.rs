// Edit interactor - Runs one container edit from an input file to an output file

use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor for single subtitle edits.
///
/// Every call probes its input fresh; nothing is cached between calls and the
/// input file is never written.
pub struct EditInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
    overwrite: OverwritePolicy,
}

impl EditInteractor {
    /// Create new edit interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
        overwrite: OverwritePolicy,
    ) -> Self {
        Self {
            probe_port,
            execute_port,
            fs_port,
            log_port,
            overwrite,
        }
    }

    pub fn overwrite_policy(&self) -> OverwritePolicy {
        self.overwrite
    }

    /// Copy one subtitle track out to a standalone file
    pub async fn extract_subtitle(&self, input: &str, position: usize, output: &str) -> bool {
        let result = self.extract(input, position, output).await;
        self.report("extract subtitle", result).await
    }

    /// Append an external subtitle file as a new track
    pub async fn add_subtitle_track(
        &self,
        input: &str,
        subtitle_file: &str,
        output: &str,
        language: Option<&str>,
        title: Option<&str>,
        is_default: bool,
    ) -> bool {
        let operation = PendingOperation::add(subtitle_file, language, title, is_default);
        let result = self.apply(input, &operation, output).await;
        self.report("add subtitle", result).await
    }

    /// Drop one subtitle track
    pub async fn remove_subtitle_track(&self, input: &str, position: usize, output: &str) -> bool {
        let result = self
            .apply(input, &PendingOperation::remove(position), output)
            .await;
        self.report("remove subtitle", result).await
    }

    /// Make one subtitle track the only default
    pub async fn set_default_subtitle(&self, input: &str, position: usize, output: &str) -> bool {
        let result = self
            .apply(input, &PendingOperation::set_default(position), output)
            .await;
        self.report("set default subtitle", result).await
    }

    /// Extract, surfacing the failure
    pub async fn extract(
        &self,
        input: &str,
        position: usize,
        output: &str,
    ) -> Result<ToolReport, DomainError> {
        let info = self.probe_port.probe(input).await?;
        let command = RemuxPlanner::extract(&info, input, position, output)?;
        self.run(command).await
    }

    /// Apply one queued edit with positions already valid for `input`
    pub async fn apply(
        &self,
        input: &str,
        operation: &PendingOperation,
        output: &str,
    ) -> Result<ToolReport, DomainError> {
        // Validation that needs no probe comes first
        RemuxPlanner::validate_paths(input, output)?;
        if let PendingOperation::AddSubtitle {
            subtitle_file_path, ..
        } = operation
        {
            if !self.fs_port.file_exists(subtitle_file_path).await? {
                return Err(DomainError::FileNotFound(subtitle_file_path.clone()));
            }
        }

        let info = self.probe_port.probe(input).await?;
        self.log_port
            .debug(&format!(
                "Probed {}: {} subtitle tracks",
                input,
                info.subtitle_count()
            ))
            .await;

        let command = match operation {
            PendingOperation::AddSubtitle {
                subtitle_file_path,
                language_tag,
                title_tag,
                is_default,
            } => RemuxPlanner::add(
                &info,
                input,
                subtitle_file_path,
                output,
                language_tag.as_deref(),
                title_tag.as_deref(),
                *is_default,
            )?,
            PendingOperation::RemoveSubtitle { target_position } => {
                RemuxPlanner::remove(&info, input, *target_position, output)?
            }
            PendingOperation::SetDefaultSubtitle { target_position } => {
                RemuxPlanner::set_default(&info, input, *target_position, output)?
            }
        };

        self.run(command).await
    }

    async fn run(&self, mut command: RemuxCommand) -> Result<ToolReport, DomainError> {
        command.overwrite = self.overwrite == OverwritePolicy::Always;
        if !command.overwrite && self.fs_port.file_exists(&command.output).await? {
            return Err(DomainError::BadArgs(format!(
                "Output file already exists: {}",
                command.output
            )));
        }
        self.execute_port.run_remux(&command).await
    }

    async fn report(&self, action: &str, result: Result<ToolReport, DomainError>) -> bool {
        match result {
            Ok(report) => {
                self.log_port
                    .info(&format!("Finished {}: {}", action, report.output))
                    .await;
                true
            }
            Err(e) => {
                self.log_port
                    .error(&format!("Failed to {}: {}", action, e))
                    .await;
                false
            }
        }
    }
}
