// Domain rules - Stream mapping policies for each container edit

use crate::domain::errors::*;
use crate::domain::model::*;

/// Builds remux commands from a fresh probe of the file being edited.
///
/// Every rule resolves positions against the `ContainerInfo` it is handed,
/// never against a cached track list.
pub struct RemuxPlanner;

impl RemuxPlanner {
    /// Copy a single subtitle stream out to a standalone file
    pub fn extract(
        info: &ContainerInfo,
        input: &str,
        position: usize,
        output: &str,
    ) -> Result<RemuxCommand, DomainError> {
        Self::validate_paths(input, output)?;
        Self::resolve_subtitle(info, position)?;

        let mut command = RemuxCommand::new(input, output);
        command.maps.push(StreamSelector::Subtitle { input: 0, position });
        command.codec = CodecDirective::Inferred;
        Ok(command)
    }

    /// Append an external subtitle file as a new track
    pub fn add(
        info: &ContainerInfo,
        input: &str,
        subtitle_file: &str,
        output: &str,
        language: Option<&str>,
        title: Option<&str>,
        is_default: bool,
    ) -> Result<RemuxCommand, DomainError> {
        Self::validate_paths(input, output)?;
        if subtitle_file == output {
            return Err(DomainError::BadArgs(
                "Subtitle file and output file must differ".to_string(),
            ));
        }

        // The new stream lands after every existing subtitle stream
        let new_index = info.subtitle_count();

        let mut command = RemuxCommand::new(input, output);
        command.inputs.push(subtitle_file.to_string());
        command.maps.push(StreamSelector::All { input: 0 });
        command.maps.push(StreamSelector::Stream { input: 1, index: 0 });

        if let Some(language) = language.filter(|l| !l.trim().is_empty()) {
            command.metadata.push(StreamMetadata {
                subtitle_index: new_index,
                key: "language".to_string(),
                value: language.trim().to_string(),
            });
        }
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            command.metadata.push(StreamMetadata {
                subtitle_index: new_index,
                key: "title".to_string(),
                value: title.trim().to_string(),
            });
        }

        if is_default {
            command
                .dispositions
                .extend((0..new_index).map(|subtitle_index| SubtitleDisposition {
                    subtitle_index,
                    default: false,
                }));
        }
        command.dispositions.push(SubtitleDisposition {
            subtitle_index: new_index,
            default: is_default,
        });

        Ok(command)
    }

    /// Drop one subtitle stream, keeping video, audio and the other subtitles in order
    pub fn remove(
        info: &ContainerInfo,
        input: &str,
        position: usize,
        output: &str,
    ) -> Result<RemuxCommand, DomainError> {
        Self::validate_paths(input, output)?;
        let target = Self::resolve_subtitle(info, position)?.container_index;

        let mut command = RemuxCommand::new(input, output);
        command.maps.extend(
            info.streams
                .iter()
                .filter(|s| match s.codec_type {
                    CodecType::Video | CodecType::Audio => true,
                    CodecType::Subtitle => s.container_index != target,
                    CodecType::Other => false,
                })
                .map(|s| StreamSelector::Stream {
                    input: 0,
                    index: s.container_index,
                }),
        );
        Ok(command)
    }

    /// Mark one subtitle stream default and clear the flag on all others
    pub fn set_default(
        info: &ContainerInfo,
        input: &str,
        position: usize,
        output: &str,
    ) -> Result<RemuxCommand, DomainError> {
        Self::validate_paths(input, output)?;
        Self::resolve_subtitle(info, position)?;

        // Dispositions are absolute per invocation, so every subtitle is restated
        let mut command = RemuxCommand::new(input, output);
        command.maps.push(StreamSelector::All { input: 0 });
        command.dispositions = (0..info.subtitle_count())
            .map(|subtitle_index| SubtitleDisposition {
                subtitle_index,
                default: subtitle_index == position,
            })
            .collect();
        Ok(command)
    }

    /// Resolve a subtitle-relative position against a probe
    pub fn resolve_subtitle(
        info: &ContainerInfo,
        position: usize,
    ) -> Result<&StreamDescriptor, DomainError> {
        info.subtitle_at(position).ok_or_else(|| {
            DomainError::OutOfRange(format!(
                "Subtitle position {} does not exist ({} subtitle tracks)",
                position,
                info.subtitle_count()
            ))
        })
    }

    /// Input and output must be distinct, non-empty paths
    pub fn validate_paths(input: &str, output: &str) -> Result<(), DomainError> {
        if input.trim().is_empty() || output.trim().is_empty() {
            return Err(DomainError::BadArgs("Input and output paths are required".to_string()));
        }
        if input == output {
            return Err(DomainError::BadArgs(format!(
                "Output must differ from input: {}",
                input
            )));
        }
        Ok(())
    }
}
