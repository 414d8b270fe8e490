//! FFmpeg execution adapter
//!
//! Renders a [`RemuxCommand`] into ffmpeg arguments and runs it as a child process.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    program: PathBuf,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter running the given executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Executable this adapter invokes
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Render the ffmpeg argument list for a remux command
    pub fn build_args(command: &RemuxCommand) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-hide_banner".into(),
            "-nostdin".into(),
            "-loglevel".into(),
            "error".into(),
            if command.overwrite { "-y" } else { "-n" }.into(),
        ];

        for input in &command.inputs {
            args.push("-i".into());
            args.push(input.clone());
        }

        for selector in &command.maps {
            args.push("-map".into());
            args.push(match selector {
                StreamSelector::All { input } => input.to_string(),
                StreamSelector::Stream { input, index } => format!("{}:{}", input, index),
                StreamSelector::Subtitle { input, position } => format!("{}:s:{}", input, position),
            });
        }

        if command.codec == CodecDirective::Copy {
            args.push("-c".into());
            args.push("copy".into());
        }

        for entry in &command.metadata {
            args.push(format!("-metadata:s:s:{}", entry.subtitle_index));
            args.push(format!("{}={}", entry.key, entry.value));
        }

        for disposition in &command.dispositions {
            args.push(format!("-disposition:s:{}", disposition.subtitle_index));
            args.push(if disposition.default { "default" } else { "0" }.into());
        }

        args.push(command.output.clone());
        args
    }
}

#[async_trait]
impl ExecutePort for FFmpegAdapter {
    async fn run_remux(&self, command: &RemuxCommand) -> Result<ToolReport, DomainError> {
        let args = Self::build_args(command);
        debug!(program = %self.program.display(), ?args, "Running remux");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::ToolUnavailable(format!("{}: {}", self.program.display(), e))
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            error!(
                output = %command.output,
                code = ?output.status.code(),
                diagnostics = %stderr,
                "Remux failed"
            );
            return Err(DomainError::ExecFail {
                tool: "ffmpeg".to_string(),
                code: output.status.code(),
                stderr,
            });
        }

        info!(output = %command.output, "Remux finished");
        Ok(ToolReport {
            output: command.output.clone(),
            diagnostics: stderr,
        })
    }
}
