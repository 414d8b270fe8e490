// Batch interactor - Chains every queued edit into one output file

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::app::edit_interactor::EditInteractor;
use crate::app::session::{BatchOutcome, EditSession};
use crate::domain::errors::*;
use crate::domain::model::PendingOperation;
use crate::domain::queue::PositionTracker;
use crate::domain::rules::RemuxPlanner;
use crate::ports::*;

/// Directory holding the intermediate files of one batch.
///
/// Owned by the caller; the directory and everything in it is removed on drop.
pub struct IntermediateWorkspace {
    temp_dir: TempDir,
}

impl IntermediateWorkspace {
    /// Create a workspace in the system temp directory
    pub fn new() -> Result<Self, DomainError> {
        let temp_dir = tempfile::Builder::new()
            .prefix("subtrack-")
            .tempdir()
            .map_err(|e| DomainError::FsFail(format!("Failed to create workspace: {}", e)))?;
        Ok(Self { temp_dir })
    }

    /// Create a workspace under `dir`
    pub fn new_in(dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let dir = dir.as_ref();
        let temp_dir = tempfile::Builder::new()
            .prefix("subtrack-")
            .tempdir_in(dir)
            .map_err(|e| {
                DomainError::FsFail(format!(
                    "Failed to create workspace in {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        Ok(Self { temp_dir })
    }

    /// Workspace directory path
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Destination for the 0-based stage `index`, sharing the final output's extension
    pub fn stage_path(&self, index: usize, final_output: &str) -> PathBuf {
        let extension = Path::new(final_output)
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "mkv".to_string());
        self.temp_dir
            .path()
            .join(format!("stage-{:02}.{}", index + 1, extension))
    }
}

/// Interactor for executing a session's queue
pub struct BatchInteractor {
    editor: Arc<EditInteractor>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
}

impl BatchInteractor {
    /// Create new batch interactor with injected ports
    pub fn new(
        editor: Arc<EditInteractor>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            editor,
            fs_port,
            log_port,
        }
    }

    /// Run every queued edit in order against the session's container.
    ///
    /// Returns false for an empty queue, a batch already running, a final output
    /// naming the input, or the first failing stage. The queue is cleared only
    /// when every stage succeeded.
    pub async fn execute_all(
        &self,
        session: &mut EditSession,
        final_output: &str,
        workspace: &IntermediateWorkspace,
    ) -> bool {
        if session.is_running() {
            self.log_port
                .warn("A batch is already running for this session")
                .await;
            return false;
        }
        if session.queue().is_empty() {
            self.log_port.info("No pending operations to execute").await;
            return false;
        }
        // The last stage must never write over the container it started from
        if let Err(e) = RemuxPlanner::validate_paths(session.input_path(), final_output) {
            self.log_port
                .error(&format!("Refusing to run batch: {}", e))
                .await;
            return false;
        }

        session.begin_batch();
        let operations = session.snapshot();
        let outcome = match self
            .run_stages(session, &operations, final_output, workspace)
            .await
        {
            Ok(()) => {
                self.log_port
                    .info(&format!(
                        "Applied {} operations to {}",
                        operations.len(),
                        final_output
                    ))
                    .await;
                BatchOutcome::Completed {
                    output: final_output.to_string(),
                }
            }
            Err((stage, error)) => {
                self.log_port
                    .error(&format!(
                        "Stage {} of {} failed: {}",
                        stage,
                        operations.len(),
                        error
                    ))
                    .await;
                BatchOutcome::Failed { stage, error }
            }
        };

        let completed = matches!(outcome, BatchOutcome::Completed { .. });
        session.finish_batch(outcome);
        completed
    }

    async fn run_stages(
        &self,
        session: &EditSession,
        operations: &[PendingOperation],
        final_output: &str,
        workspace: &IntermediateWorkspace,
    ) -> Result<(), (usize, DomainError)> {
        let mut tracker = PositionTracker::new(session.tracks().len());
        let mut current_input = session.input_path().to_string();

        for (index, operation) in operations.iter().enumerate() {
            let stage = index + 1;
            let destination = if stage == operations.len() {
                final_output.to_string()
            } else {
                workspace
                    .stage_path(index, final_output)
                    .to_string_lossy()
                    .to_string()
            };

            let live_operation = match tracker.resolve_operation(operation) {
                Ok(Some(position)) => operation.retarget(position),
                Ok(None) => operation.clone(),
                Err(e) => return Err((stage, e)),
            };

            self.log_port
                .info(&format!(
                    "Stage {}/{}: {}",
                    stage,
                    operations.len(),
                    operation.describe(session.tracks())
                ))
                .await;

            if let Err(e) = self
                .editor
                .apply(&current_input, &live_operation, &destination)
                .await
            {
                if e.tool_ran() {
                    self.discard_partial(&destination).await;
                }
                return Err((stage, e));
            }

            tracker.apply(operation).map_err(|e| (stage, e))?;
            current_input = destination;
        }

        Ok(())
    }

    async fn discard_partial(&self, path: &str) {
        match self.fs_port.file_exists(path).await {
            Ok(true) => {
                if let Err(e) = self.fs_port.delete_file(path).await {
                    self.log_port
                        .warn(&format!("Could not remove partial output {}: {}", path, e))
                        .await;
                }
            }
            Ok(false) => {}
            Err(e) => {
                self.log_port
                    .warn(&format!("Could not check partial output {}: {}", path, e))
                    .await;
            }
        }
    }
}
