//! subtrack Subtitle Track Editor Library
//!
//! Inspects video containers and edits their subtitle tracks (extract, add,
//! remove, set default) by driving ffprobe and ffmpeg. Edits can be queued on
//! an [`app::EditSession`] and applied in one batch, chaining intermediate
//! files so the original container is never modified.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use app::{BatchInteractor, EditInteractor, EditSession, InspectInteractor, IntermediateWorkspace};
pub use domain::errors::{DomainError, DomainResult, ErrorKind};
pub use domain::model::{ContainerInfo, PendingOperation, StreamDescriptor, SubtitleTrack};
pub use domain::queue::OperationQueue;
