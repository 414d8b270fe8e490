// Domain models - Core types and data structures

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Elementary stream kind as reported by the probing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
    Other,
}

impl CodecType {
    /// Parse the probe tool's `codec_type` string; anything unknown is `Other`
    pub fn parse(codec_type: &str) -> Self {
        match codec_type.to_lowercase().as_str() {
            "video" => CodecType::Video,
            "audio" => CodecType::Audio,
            "subtitle" => CodecType::Subtitle,
            _ => CodecType::Other,
        }
    }
}

/// One stream of a probed container. Rebuilt on every probe, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub container_index: usize,
    pub codec_type: CodecType,
    pub codec_name: String,
    pub language_tag: Option<String>,
    pub title_tag: Option<String>,
    pub is_default: bool,
}

impl StreamDescriptor {
    /// Create a stream descriptor without tags or disposition
    pub fn new(container_index: usize, codec_type: CodecType, codec_name: impl Into<String>) -> Self {
        Self {
            container_index,
            codec_type,
            codec_name: codec_name.into(),
            language_tag: None,
            title_tag: None,
            is_default: false,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language_tag = Some(language.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title_tag = Some(title.into());
        self
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn is_subtitle(&self) -> bool {
        self.codec_type == CodecType::Subtitle
    }
}

/// Complete description of a probed container
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub streams: Vec<StreamDescriptor>,
    pub format_name: String,
    pub duration_seconds: f64,
    pub size_bytes: u64,
}

impl ContainerInfo {
    /// Subtitle streams in scan order
    pub fn subtitle_streams(&self) -> impl Iterator<Item = &StreamDescriptor> {
        self.streams.iter().filter(|s| s.is_subtitle())
    }

    /// Number of subtitle streams
    pub fn subtitle_count(&self) -> usize {
        self.subtitle_streams().count()
    }

    /// Resolve a subtitle-relative position to its stream
    pub fn subtitle_at(&self, position: usize) -> Option<&StreamDescriptor> {
        self.subtitle_streams().nth(position)
    }

    /// Count streams of the given kind
    pub fn count_of(&self, codec_type: CodecType) -> usize {
        self.streams.iter().filter(|s| s.codec_type == codec_type).count()
    }

    /// Human-readable summary of the container at `path`
    pub fn summary(&self, path: &str) -> ContainerSummary {
        let file_name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string());

        ContainerSummary {
            file_name,
            duration_seconds: self.duration_seconds,
            size_bytes: self.size_bytes,
            format_name: self.format_name.clone(),
        }
    }
}

/// File / duration / size / format block shown when a container is loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerSummary {
    pub file_name: String,
    pub duration_seconds: f64,
    pub size_bytes: u64,
    pub format_name: String,
}

impl fmt::Display for ContainerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.duration_seconds.max(0.0) as u64;
        writeln!(f, "File: {}", self.file_name)?;
        writeln!(f, "Duration: {}:{:02}", total / 60, total % 60)?;
        writeln!(f, "Size: {:.1} MB", self.size_bytes as f64 / 1_048_576.0)?;
        write!(f, "Format: {}", self.format_name)
    }
}

/// A subtitle stream as presented to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    /// 0-based order among the container's subtitle streams
    pub position_in_list: usize,
    /// Stream index inside this particular container file
    pub container_stream_index: usize,
    pub codec_name: String,
    pub language_tag: Option<String>,
    pub title_tag: String,
    pub is_default: bool,
}

impl SubtitleTrack {
    /// Language for display, `unknown` when the stream carries no tag
    pub fn display_language(&self) -> &str {
        self.language_tag.as_deref().unwrap_or("unknown")
    }
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} | Language: {} | Codec: {}",
            self.position_in_list,
            self.title_tag,
            self.display_language(),
            self.codec_name
        )?;
        if self.is_default {
            write!(f, " | DEFAULT")?;
        }
        Ok(())
    }
}

/// Project the subtitle streams of a container into the track list.
///
/// Positions follow stream scan order among subtitle streams only.
pub fn derive_subtitle_tracks(info: &ContainerInfo) -> Vec<SubtitleTrack> {
    info.subtitle_streams()
        .enumerate()
        .map(|(position, stream)| SubtitleTrack {
            position_in_list: position,
            container_stream_index: stream.container_index,
            codec_name: stream.codec_name.clone(),
            language_tag: stream.language_tag.clone(),
            title_tag: stream
                .title_tag
                .clone()
                .unwrap_or_else(|| format!("Subtitle Track {}", position + 1)),
            is_default: stream.is_default,
        })
        .collect()
}

/// A queued container edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PendingOperation {
    AddSubtitle {
        subtitle_file_path: String,
        #[serde(default)]
        language_tag: Option<String>,
        #[serde(default)]
        title_tag: Option<String>,
        #[serde(default)]
        is_default: bool,
    },
    RemoveSubtitle {
        target_position: usize,
    },
    SetDefaultSubtitle {
        target_position: usize,
    },
}

impl PendingOperation {
    /// Convenience constructor for an add request
    pub fn add(
        subtitle_file_path: impl Into<String>,
        language_tag: Option<&str>,
        title_tag: Option<&str>,
        is_default: bool,
    ) -> Self {
        PendingOperation::AddSubtitle {
            subtitle_file_path: subtitle_file_path.into(),
            language_tag: language_tag.map(str::to_string),
            title_tag: title_tag.map(str::to_string),
            is_default,
        }
    }

    pub fn remove(target_position: usize) -> Self {
        PendingOperation::RemoveSubtitle { target_position }
    }

    pub fn set_default(target_position: usize) -> Self {
        PendingOperation::SetDefaultSubtitle { target_position }
    }

    /// Position in the loaded track list this operation refers to, if any
    pub fn target_position(&self) -> Option<usize> {
        match self {
            PendingOperation::AddSubtitle { .. } => None,
            PendingOperation::RemoveSubtitle { target_position }
            | PendingOperation::SetDefaultSubtitle { target_position } => Some(*target_position),
        }
    }

    /// Same operation aimed at another track position; additions are unchanged
    pub fn retarget(&self, position: usize) -> Self {
        match self {
            PendingOperation::AddSubtitle { .. } => self.clone(),
            PendingOperation::RemoveSubtitle { .. } => PendingOperation::remove(position),
            PendingOperation::SetDefaultSubtitle { .. } => PendingOperation::set_default(position),
        }
    }

    /// One-line description for confirmation prompts, using track titles where known
    pub fn describe(&self, tracks: &[SubtitleTrack]) -> String {
        let track_label = |position: usize| {
            tracks
                .get(position)
                .map(|t| t.title_tag.clone())
                .unwrap_or_else(|| format!("Subtitle Track {}", position + 1))
        };

        match self {
            PendingOperation::AddSubtitle {
                subtitle_file_path,
                language_tag,
                title_tag,
                is_default,
            } => {
                let file_name = Path::new(subtitle_file_path)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| subtitle_file_path.clone());
                let mut text = format!(
                    "Add subtitle: {} ({})",
                    title_tag.as_deref().unwrap_or(&file_name),
                    language_tag.as_deref().unwrap_or("unknown")
                );
                if *is_default {
                    text.push_str(" [default]");
                }
                text
            }
            PendingOperation::RemoveSubtitle { target_position } => {
                format!("Remove subtitle: {}", track_label(*target_position))
            }
            PendingOperation::SetDefaultSubtitle { target_position } => {
                format!("Set default subtitle: {}", track_label(*target_position))
            }
        }
    }
}

/// Which input stream(s) a map directive selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSelector {
    /// Every stream of an input
    All { input: usize },
    /// One stream by its container index
    Stream { input: usize, index: usize },
    /// One stream by its subtitle-relative position
    Subtitle { input: usize, position: usize },
}

/// How mapped streams are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecDirective {
    /// Stream copy, no re-encode
    Copy,
    /// Let the tool pick from the output extension
    Inferred,
}

/// Metadata key/value for one output subtitle stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMetadata {
    pub subtitle_index: usize,
    pub key: String,
    pub value: String,
}

/// Default flag for one output subtitle stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtitleDisposition {
    pub subtitle_index: usize,
    pub default: bool,
}

/// Tool-independent description of one remux invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RemuxCommand {
    pub inputs: Vec<String>,
    pub maps: Vec<StreamSelector>,
    pub codec: CodecDirective,
    pub metadata: Vec<StreamMetadata>,
    pub dispositions: Vec<SubtitleDisposition>,
    pub output: String,
    pub overwrite: bool,
}

impl RemuxCommand {
    /// Start a command reading `input` and writing `output`
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            inputs: vec![input.into()],
            maps: Vec::new(),
            codec: CodecDirective::Copy,
            metadata: Vec::new(),
            dispositions: Vec::new(),
            output: output.into(),
            overwrite: true,
        }
    }

    /// Disposition requested for an output subtitle stream, if restated
    pub fn disposition_for(&self, subtitle_index: usize) -> Option<bool> {
        self.dispositions
            .iter()
            .find(|d| d.subtitle_index == subtitle_index)
            .map(|d| d.default)
    }

    /// Metadata value requested for an output subtitle stream
    pub fn metadata_for(&self, subtitle_index: usize, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|m| m.subtitle_index == subtitle_index && m.key == key)
            .map(|m| m.value.as_str())
    }
}

/// Whether an existing output file may be replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwritePolicy {
    #[default]
    Always,
    Never,
}

impl OverwritePolicy {
    /// Parse overwrite policy from string
    pub fn parse(policy: &str) -> Result<Self, DomainError> {
        match policy.to_lowercase().as_str() {
            "always" => Ok(OverwritePolicy::Always),
            "never" => Ok(OverwritePolicy::Never),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid overwrite policy: {}. Valid policies: always, never",
                policy
            ))),
        }
    }
}

/// What a successful tool run left behind for logging
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolReport {
    pub output: String,
    pub diagnostics: String,
}
