//! In-memory probe/remux/filesystem doubles shared by integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use subtrack_cli::adapters::TracingLogAdapter;
use subtrack_cli::app::container::DefaultAppContainer;
use subtrack_cli::config_initialization::Settings;
use subtrack_cli::domain::errors::DomainError;
use subtrack_cli::domain::model::*;
use subtrack_cli::ports::{ExecutePort, FsPort, LogPort, ProbePort};

/// A file in the fake filesystem
#[derive(Debug, Clone, PartialEq)]
pub enum FakeFile {
    Container(ContainerInfo),
    /// Opaque payload such as a standalone subtitle file
    Blob(String),
}

#[derive(Default)]
struct State {
    files: HashMap<String, FakeFile>,
    commands: Vec<RemuxCommand>,
    fail_on_call: Option<usize>,
    calls: usize,
}

/// Fake media environment interpreting `RemuxCommand`s the way ffmpeg would
#[derive(Clone, Default)]
pub struct FakeMedia {
    state: Arc<Mutex<State>>,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, path: &str, file: FakeFile) {
        self.state.lock().unwrap().files.insert(path.to_string(), file);
    }

    pub fn get(&self, path: &str) -> Option<FakeFile> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub fn exists(&self, path: &str) -> bool {
        self.state.lock().unwrap().files.contains_key(path)
    }

    pub fn container(&self, path: &str) -> ContainerInfo {
        match self.get(path) {
            Some(FakeFile::Container(info)) => info,
            other => panic!("{} is not a container: {:?}", path, other),
        }
    }

    /// Every remux command run so far
    pub fn commands(&self) -> Vec<RemuxCommand> {
        self.state.lock().unwrap().commands.clone()
    }

    /// Make the n-th (1-based) remux call fail after writing a partial output
    pub fn fail_on_call(&self, n: usize) {
        self.state.lock().unwrap().fail_on_call = Some(n);
    }

    /// Container with a video stream, an audio stream and the given subtitles
    pub fn movie(subtitles: &[(&str, &str, bool)]) -> ContainerInfo {
        let mut streams = vec![
            StreamDescriptor::new(0, CodecType::Video, "h264"),
            StreamDescriptor::new(1, CodecType::Audio, "aac").with_language("eng"),
        ];
        for (i, (language, title, is_default)) in subtitles.iter().enumerate() {
            streams.push(
                StreamDescriptor::new(i + 2, CodecType::Subtitle, "subrip")
                    .with_language(*language)
                    .with_title(*title)
                    .with_default(*is_default),
            );
        }
        ContainerInfo {
            streams,
            format_name: "matroska,webm".to_string(),
            duration_seconds: 120.0,
            size_bytes: 10 * 1_048_576,
        }
    }

    fn input_streams(file: &FakeFile) -> Vec<StreamDescriptor> {
        match file {
            FakeFile::Container(info) => info.streams.clone(),
            FakeFile::Blob(_) => vec![StreamDescriptor::new(0, CodecType::Subtitle, "subrip")],
        }
    }

    fn remux(state: &State, command: &RemuxCommand) -> Result<FakeFile, String> {
        let inputs = command
            .inputs
            .iter()
            .map(|path| {
                state
                    .files
                    .get(path)
                    .map(Self::input_streams)
                    .ok_or_else(|| format!("{}: No such file or directory", path))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut streams = Vec::new();
        for selector in &command.maps {
            match *selector {
                StreamSelector::All { input } => streams.extend(inputs[input].iter().cloned()),
                StreamSelector::Stream { input, index } => streams.push(
                    inputs[input]
                        .iter()
                        .find(|s| s.container_index == index)
                        .cloned()
                        .ok_or_else(|| format!("Stream map '{}:{}' matches no streams", input, index))?,
                ),
                StreamSelector::Subtitle { input, position } => streams.push(
                    inputs[input]
                        .iter()
                        .filter(|s| s.is_subtitle())
                        .nth(position)
                        .cloned()
                        .ok_or_else(|| format!("Stream map '{}:s:{}' matches no streams", input, position))?,
                ),
            }
        }

        if command.codec == CodecDirective::Inferred {
            return Ok(FakeFile::Blob(format!("{} streams", streams.len())));
        }

        let mut subtitle_index = 0;
        for (index, stream) in streams.iter_mut().enumerate() {
            stream.container_index = index;
            if !stream.is_subtitle() {
                continue;
            }
            if let Some(language) = command.metadata_for(subtitle_index, "language") {
                stream.language_tag = Some(language.to_string());
            }
            if let Some(title) = command.metadata_for(subtitle_index, "title") {
                stream.title_tag = Some(title.to_string());
            }
            if let Some(default) = command.disposition_for(subtitle_index) {
                stream.is_default = default;
            }
            subtitle_index += 1;
        }

        let input = match state.files.get(&command.inputs[0]) {
            Some(FakeFile::Container(info)) => info.clone(),
            _ => ContainerInfo::default(),
        };
        Ok(FakeFile::Container(ContainerInfo { streams, ..input }))
    }
}

#[async_trait]
impl ProbePort for FakeMedia {
    async fn probe(&self, file_path: &str) -> Result<ContainerInfo, DomainError> {
        match self.get(file_path) {
            Some(FakeFile::Container(info)) => Ok(info),
            Some(FakeFile::Blob(_)) => Err(DomainError::ProbeFail(format!(
                "{}: Invalid data found when processing input",
                file_path
            ))),
            None => Err(DomainError::ProbeFail(format!(
                "Input file does not exist: {}",
                file_path
            ))),
        }
    }
}

#[async_trait]
impl ExecutePort for FakeMedia {
    async fn run_remux(&self, command: &RemuxCommand) -> Result<ToolReport, DomainError> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(command.clone());
        state.calls += 1;

        let exec_fail = |stderr: String| DomainError::ExecFail {
            tool: "ffmpeg".to_string(),
            code: Some(1),
            stderr,
        };

        if state.fail_on_call == Some(state.calls) {
            state
                .files
                .insert(command.output.clone(), FakeFile::Blob("partial".to_string()));
            return Err(exec_fail("Conversion failed!".to_string()));
        }
        if !command.overwrite && state.files.contains_key(&command.output) {
            return Err(exec_fail(format!("File '{}' already exists", command.output)));
        }

        let output = Self::remux(&state, command).map_err(exec_fail)?;
        state.files.insert(command.output.clone(), output);
        Ok(ToolReport {
            output: command.output.clone(),
            diagnostics: String::new(),
        })
    }
}

#[async_trait]
impl FsPort for FakeMedia {
    async fn file_exists(&self, file_path: &str) -> Result<bool, DomainError> {
        Ok(self.exists(file_path))
    }

    async fn copy_file(&self, from: &str, to: &str) -> Result<(), DomainError> {
        let file = self
            .get(from)
            .ok_or_else(|| DomainError::FsFail(format!("No such file: {}", from)))?;
        self.put(to, file);
        Ok(())
    }

    async fn delete_file(&self, file_path: &str) -> Result<(), DomainError> {
        self.state.lock().unwrap().files.remove(file_path);
        Ok(())
    }
}

/// Container wired entirely to `media`
pub fn container_with(media: &FakeMedia, overwrite: OverwritePolicy) -> DefaultAppContainer {
    let settings = Settings {
        overwrite,
        ..Settings::default()
    };
    let log_port: Arc<dyn LogPort> = Arc::new(TracingLogAdapter::default());
    DefaultAppContainer::with_ports(
        settings,
        Arc::new(media.clone()),
        Arc::new(media.clone()),
        Arc::new(media.clone()),
        log_port,
    )
}

/// Subtitle titles of a container in position order
pub fn titles(info: &ContainerInfo) -> Vec<String> {
    derive_subtitle_tracks(info)
        .into_iter()
        .map(|t| t.title_tag)
        .collect()
}

/// Positions of default subtitle tracks
pub fn defaults(info: &ContainerInfo) -> Vec<usize> {
    derive_subtitle_tracks(info)
        .into_iter()
        .filter(|t| t.is_default)
        .map(|t| t.position_in_list)
        .collect()
}
