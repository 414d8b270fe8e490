//! FFprobe adapter for container probing
//!
//! Runs `ffprobe` with JSON output and maps the stream list into the domain model.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    #[serde(default)]
    format_name: Option<String>,
    duration: Option<String>,
    size: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: usize,
    #[serde(default)]
    codec_type: Option<String>,
    codec_name: Option<String>,
    #[serde(default)]
    disposition: FfprobeDisposition,
    #[serde(default)]
    tags: FfprobeTags,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeDisposition {
    #[serde(default)]
    default: u8,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeTags {
    language: Option<String>,
    #[serde(rename = "LANGUAGE")]
    language_upper: Option<String>,
    title: Option<String>,
    #[serde(rename = "TITLE")]
    title_upper: Option<String>,
}

impl FfprobeTags {
    /// Lowercase key wins unless blank; Matroska often carries both spellings
    fn pick(lower: Option<String>, upper: Option<String>) -> Option<String> {
        let present = |v: &String| !v.trim().is_empty();
        lower.filter(present).or_else(|| upper.filter(present))
    }

    fn into_language_and_title(self) -> (Option<String>, Option<String>) {
        (
            Self::pick(self.language, self.language_upper),
            Self::pick(self.title, self.title_upper),
        )
    }
}

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    program: PathBuf,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter running the given executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Executable this adapter invokes
    pub fn program(&self) -> &Path {
        &self.program
    }
}

/// Parse ffprobe's `-print_format json -show_format -show_streams` output
pub fn parse_ffprobe_json(json: &str) -> Result<ContainerInfo, DomainError> {
    let output: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| DomainError::ProbeFail(format!("Unreadable ffprobe output: {}", e)))?;

    let streams = output
        .streams
        .into_iter()
        .map(|stream| {
            let (language_tag, title_tag) = stream.tags.into_language_and_title();
            StreamDescriptor {
                container_index: stream.index,
                codec_type: CodecType::parse(stream.codec_type.as_deref().unwrap_or_default()),
                codec_name: stream.codec_name.unwrap_or_else(|| "unknown".to_string()),
                language_tag,
                title_tag,
                is_default: stream.disposition.default == 1,
            }
        })
        .collect();

    let format = output.format;
    Ok(ContainerInfo {
        streams,
        format_name: format
            .as_ref()
            .and_then(|f| f.format_name.clone())
            .unwrap_or_else(|| "unknown".to_string()),
        duration_seconds: format
            .as_ref()
            .and_then(|f| f.duration.as_deref())
            .and_then(|d| d.parse().ok())
            .unwrap_or(0.0),
        size_bytes: format
            .as_ref()
            .and_then(|f| f.size.as_deref())
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
    })
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe(&self, file_path: &str) -> Result<ContainerInfo, DomainError> {
        if !Path::new(file_path).exists() {
            return Err(DomainError::ProbeFail(format!(
                "Input file does not exist: {}",
                file_path
            )));
        }

        debug!(program = %self.program.display(), file = file_path, "Probing container");

        let output = Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(file_path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::ProbeFail(format!(
                    "Failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            warn!(
                file = file_path,
                code = ?output.status.code(),
                diagnostics = %stderr.trim(),
                "ffprobe could not analyse container"
            );
            return Err(DomainError::ProbeFail(format!(
                "ffprobe failed for {}: {}",
                file_path,
                stderr.trim()
            )));
        }

        let json = String::from_utf8_lossy(&output.stdout);
        let info = parse_ffprobe_json(&json)?;
        debug!(
            file = file_path,
            streams = info.streams.len(),
            subtitles = info.subtitle_count(),
            "Container probed"
        );
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {"index": 0, "codec_name": "h264", "codec_type": "video",
             "disposition": {"default": 1, "forced": 0}},
            {"index": 1, "codec_name": "aac", "codec_type": "audio",
             "tags": {"language": "eng"}},
            {"index": 2, "codec_name": "subrip", "codec_type": "subtitle",
             "disposition": {"default": 1, "forced": 0},
             "tags": {"language": "eng", "title": "English"}},
            {"index": 3, "codec_type": "attachment",
             "tags": {"filename": "font.ttf", "mimetype": "font/ttf"}},
            {"index": 4, "codec_name": "ass", "codec_type": "subtitle",
             "disposition": {"default": 0}, "tags": {"LANGUAGE": "fre"}}
        ],
        "format": {
            "filename": "movie.mkv",
            "format_name": "matroska,webm",
            "duration": "125.400000",
            "size": "3145728"
        }
    }"#;

    #[test]
    fn test_parse_streams_and_format() {
        let info = parse_ffprobe_json(SAMPLE).unwrap();

        assert_eq!(info.streams.len(), 5);
        assert_eq!(info.format_name, "matroska,webm");
        assert_eq!(info.duration_seconds, 125.4);
        assert_eq!(info.size_bytes, 3_145_728);

        assert_eq!(info.streams[3].codec_type, CodecType::Other);
        assert_eq!(info.streams[3].codec_name, "unknown");
        assert_eq!(info.subtitle_count(), 2);
    }

    #[test]
    fn test_parse_tags_and_disposition() {
        let info = parse_ffprobe_json(SAMPLE).unwrap();

        let english = &info.streams[2];
        assert!(english.is_default);
        assert_eq!(english.language_tag.as_deref(), Some("eng"));
        assert_eq!(english.title_tag.as_deref(), Some("English"));

        let french = &info.streams[4];
        assert!(!french.is_default);
        assert_eq!(french.language_tag.as_deref(), Some("fre"));
        assert_eq!(french.title_tag, None);
    }

    #[test]
    fn test_parse_tags_in_both_spellings() {
        let json = r#"{
            "streams": [
                {"index": 0, "codec_name": "subrip", "codec_type": "subtitle",
                 "tags": {"title": "Director", "TITLE": "Commentary",
                          "language": " ", "LANGUAGE": "ger"}},
                {"index": 1, "codec_name": "subrip", "codec_type": "subtitle",
                 "tags": {"title": "", "TITLE": ""}}
            ]
        }"#;
        let info = parse_ffprobe_json(json).unwrap();

        assert_eq!(info.streams[0].title_tag.as_deref(), Some("Director"));
        assert_eq!(info.streams[0].language_tag.as_deref(), Some("ger"));
        assert_eq!(info.streams[1].title_tag, None);
        assert_eq!(info.streams[1].language_tag, None);
    }

    #[test]
    fn test_parse_missing_format_fields() {
        let info = parse_ffprobe_json(r#"{"streams": [], "format": {}}"#).unwrap();
        assert_eq!(info.format_name, "unknown");
        assert_eq!(info.duration_seconds, 0.0);
        assert_eq!(info.size_bytes, 0);
    }

    #[test]
    fn test_parse_garbage_is_probe_failure() {
        assert!(matches!(
            parse_ffprobe_json("not json"),
            Err(DomainError::ProbeFail(_))
        ));
    }

    #[tokio::test]
    async fn test_probe_missing_file() {
        let adapter = FFprobeAdapter::new("ffprobe");
        let err = adapter
            .probe("/definitely/not/here/movie.mkv")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ProbeFail(_)));
    }

    #[tokio::test]
    async fn test_probe_with_missing_tool() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let adapter = FFprobeAdapter::new("nonexistent_ffprobe_xyz_12345");
        let err = adapter
            .probe(file.path().to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ProbeFail(_)));
    }
}
