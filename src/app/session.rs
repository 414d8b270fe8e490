// Edit session - Per-container state owned by the caller

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::queue::OperationQueue;
use crate::ports::ProbePort;

/// Whether a batch is currently executing against the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Running,
}

/// How the most recent batch ended
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Completed {
        output: String,
    },
    Failed {
        /// 1-based stage that failed
        stage: usize,
        error: DomainError,
    },
}

/// A loaded container with its track list and pending edits.
///
/// The track list is the snapshot queued positions refer to. It is replaced
/// wholesale on reload and never patched in place.
#[derive(Debug, Clone)]
pub struct EditSession {
    input_path: String,
    info: ContainerInfo,
    tracks: Vec<SubtitleTrack>,
    queue: OperationQueue,
    state: BatchState,
    last_outcome: Option<BatchOutcome>,
}

impl EditSession {
    /// Build a session from an existing probe result
    pub fn new(input_path: impl Into<String>, info: ContainerInfo) -> Self {
        let tracks = derive_subtitle_tracks(&info);
        Self {
            input_path: input_path.into(),
            info,
            tracks,
            queue: OperationQueue::new(),
            state: BatchState::Idle,
            last_outcome: None,
        }
    }

    /// Probe `input_path` and open a session on it
    pub async fn load(probe: &dyn ProbePort, input_path: &str) -> Result<Self, DomainError> {
        let info = probe.probe(input_path).await?;
        Ok(Self::new(input_path, info))
    }

    /// Re-probe the container and replace the track model. The queue is kept.
    pub async fn reload(&mut self, probe: &dyn ProbePort) -> Result<(), DomainError> {
        if self.is_running() {
            return Err(DomainError::BadArgs(
                "Cannot reload while a batch is running".to_string(),
            ));
        }
        self.info = probe.probe(&self.input_path).await?;
        self.tracks = derive_subtitle_tracks(&self.info);
        Ok(())
    }

    pub fn input_path(&self) -> &str {
        &self.input_path
    }

    pub fn info(&self) -> &ContainerInfo {
        &self.info
    }

    /// Subtitle tracks as of the last load
    pub fn tracks(&self) -> &[SubtitleTrack] {
        &self.tracks
    }

    pub fn queue(&self) -> &OperationQueue {
        &self.queue
    }

    pub fn enqueue(&mut self, operation: PendingOperation) {
        self.queue.enqueue(operation);
    }

    pub fn remove_at(&mut self, index: usize) -> Option<PendingOperation> {
        self.queue.remove_at(index)
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    /// Copy of the pending operations in execution order
    pub fn snapshot(&self) -> Vec<PendingOperation> {
        self.queue.snapshot()
    }

    /// Human-readable list of pending operations
    pub fn describe_queue(&self) -> Vec<String> {
        self.queue.iter().map(|op| op.describe(&self.tracks)).collect()
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == BatchState::Running
    }

    pub fn last_outcome(&self) -> Option<&BatchOutcome> {
        self.last_outcome.as_ref()
    }

    /// Enter `Running`; false if a batch is already running
    pub fn begin_batch(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = BatchState::Running;
        true
    }

    /// Return to `Idle`, clearing the queue only when the batch completed
    pub fn finish_batch(&mut self, outcome: BatchOutcome) {
        if matches!(outcome, BatchOutcome::Completed { .. }) {
            self.queue.clear();
        }
        self.last_outcome = Some(outcome);
        self.state = BatchState::Idle;
    }
}
