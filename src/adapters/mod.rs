// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fs_local;
pub mod probe_ffprobe;
pub mod toml_config;
pub mod tracing_log;

use std::path::PathBuf;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use fs_local::LocalFsAdapter;
pub use probe_ffprobe::FFprobeAdapter;
pub use toml_config::TomlConfigAdapter;
pub use tracing_log::TracingLogAdapter;

/// Resolve a configured tool name or path to an executable.
///
/// Falls back to the configured value unchanged when the lookup fails, so the
/// spawn error surfaces at first use.
pub fn resolve_tool(configured: &str) -> PathBuf {
    match which::which(configured) {
        Ok(path) => {
            tracing::debug!(tool = configured, path = %path.display(), "Resolved tool");
            path
        }
        Err(e) => {
            tracing::debug!(tool = configured, error = %e, "Tool not found on PATH");
            PathBuf::from(configured)
        }
    }
}
