// Inspect interactor - Loads a container and reports its subtitle tracks

use std::sync::Arc;

use serde::Serialize;

use crate::app::session::EditSession;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Interactor for container inspection and session loading
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            probe_port,
            fs_port,
            log_port,
        }
    }

    /// Open an edit session on a container
    pub async fn open_session(&self, input_path: &str) -> Result<EditSession, DomainError> {
        if !self.fs_port.file_exists(input_path).await? {
            return Err(DomainError::FileNotFound(input_path.to_string()));
        }

        let session = EditSession::load(self.probe_port.as_ref(), input_path).await?;
        self.log_port
            .info(&format!(
                "Loaded {}: {} streams, {} subtitle tracks",
                input_path,
                session.info().streams.len(),
                session.tracks().len()
            ))
            .await;
        Ok(session)
    }

    /// Re-probe the session's container
    pub async fn reload(&self, session: &mut EditSession) -> Result<(), DomainError> {
        session.reload(self.probe_port.as_ref()).await?;
        self.log_port
            .debug(&format!(
                "Reloaded {}: {} subtitle tracks",
                session.input_path(),
                session.tracks().len()
            ))
            .await;
        Ok(())
    }

    /// Inspect a container and render the report
    pub async fn execute(&self, request: InspectRequest) -> Result<InspectResponse, DomainError> {
        let session = self.open_session(&request.input_path).await?;
        let report = InspectReport::from_session(&session);

        let summary = match request.format {
            ReportFormat::Json => serde_json::to_string_pretty(&report).map_err(|e| {
                DomainError::InternalError(format!("JSON serialization failed: {}", e))
            })?,
            ReportFormat::Yaml => serde_yaml::to_string(&report).map_err(|e| {
                DomainError::InternalError(format!("YAML serialization failed: {}", e))
            })?,
            ReportFormat::Text => report.to_text(),
        };

        Ok(InspectResponse { report, summary })
    }
}

/// Output format for inspection reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl ReportFormat {
    pub fn parse(format: &str) -> Result<Self, DomainError> {
        match format.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid format: {}. Valid formats: text, json, yaml",
                format
            ))),
        }
    }
}

/// Request for container inspection
#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub input_path: String,
    pub format: ReportFormat,
}

impl InspectRequest {
    pub fn new(input_path: impl Into<String>, format: ReportFormat) -> Self {
        Self {
            input_path: input_path.into(),
            format,
        }
    }
}

/// Serializable view of a loaded container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub file: ContainerSummary,
    pub video_streams: usize,
    pub audio_streams: usize,
    pub subtitle_tracks: Vec<SubtitleTrack>,
}

impl InspectReport {
    pub fn from_session(session: &EditSession) -> Self {
        let info = session.info();
        Self {
            file: info.summary(session.input_path()),
            video_streams: info.count_of(CodecType::Video),
            audio_streams: info.count_of(CodecType::Audio),
            subtitle_tracks: session.tracks().to_vec(),
        }
    }

    /// Human-readable rendering
    pub fn to_text(&self) -> String {
        let mut output = format!("{}\n", self.file);
        output.push_str(&format!(
            "Streams: {} video, {} audio, {} subtitle\n",
            self.video_streams,
            self.audio_streams,
            self.subtitle_tracks.len()
        ));

        if self.subtitle_tracks.is_empty() {
            output.push_str("\nNo subtitle tracks\n");
        } else {
            output.push_str(&format!("\nSubtitle tracks ({}):\n", self.subtitle_tracks.len()));
            for track in &self.subtitle_tracks {
                output.push_str(&format!("  {}\n", track));
            }
        }
        output
    }
}

/// Response from container inspection
#[derive(Debug, Clone)]
pub struct InspectResponse {
    pub report: InspectReport,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> EditSession {
        EditSession::new(
            "/videos/movie.mkv",
            ContainerInfo {
                streams: vec![
                    StreamDescriptor::new(0, CodecType::Video, "h264"),
                    StreamDescriptor::new(1, CodecType::Audio, "aac"),
                    StreamDescriptor::new(2, CodecType::Subtitle, "subrip")
                        .with_language("eng")
                        .with_title("English")
                        .with_default(true),
                ],
                format_name: "matroska,webm".to_string(),
                duration_seconds: 95.0,
                size_bytes: 2_097_152,
            },
        )
    }

    #[test]
    fn test_report_format_parse() {
        assert_eq!(ReportFormat::parse("JSON").unwrap(), ReportFormat::Json);
        assert_eq!(ReportFormat::parse("yml").unwrap(), ReportFormat::Yaml);
        assert!(ReportFormat::parse("xml").is_err());
    }

    #[test]
    fn test_text_report() {
        let text = InspectReport::from_session(&sample_session()).to_text();
        assert!(text.contains("movie.mkv"));
        assert!(text.contains("1:35"));
        assert!(text.contains("Streams: 1 video, 1 audio, 1 subtitle"));
        assert!(text.contains("#0 English | Language: eng | Codec: subrip | DEFAULT"));
    }

    #[test]
    fn test_json_report_shape() {
        let report = InspectReport::from_session(&sample_session());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["video_streams"], 1);
        assert_eq!(value["subtitle_tracks"][0]["container_stream_index"], 2);
        assert_eq!(value["subtitle_tracks"][0]["language_tag"], "eng");
    }
}
