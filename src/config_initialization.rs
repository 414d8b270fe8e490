//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::adapters::resolve_tool;
use crate::adapters::toml_config::DEFAULT_CONFIG_FILE;
use crate::domain::errors::*;
use crate::domain::model::OverwritePolicy;
use crate::ports::*;

/// Environment variables and the config keys they override
pub const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("SUBTRACK_LOG_LEVEL", "log_level"),
    ("SUBTRACK_LOG_FORMAT", "log_format"),
    ("SUBTRACK_FFMPEG_PATH", "ffmpeg_path"),
    ("SUBTRACK_FFPROBE_PATH", "ffprobe_path"),
    ("SUBTRACK_OVERWRITE_POLICY", "overwrite_policy"),
    ("SUBTRACK_WORK_DIR", "work_dir"),
];

/// Values given on the command line, highest precedence
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub json_logs: bool,
    pub overwrite: bool,
}

/// Validated runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_level: LogLevel,
    pub json_logs: bool,
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub overwrite: OverwritePolicy,
    /// Parent for intermediate workspaces; system temp dir when unset
    pub work_dir: Option<PathBuf>,
    /// Config file that was loaded, if any
    pub config_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            json_logs: false,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            overwrite: OverwritePolicy::Always,
            work_dir: None,
            config_file: None,
        }
    }
}

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub async fn initialize_configuration_hierarchy(
    config: &dyn ConfigPort,
    overrides: &ConfigOverrides,
) -> Result<Settings, DomainError> {
    resolve_settings(config, overrides, |key| std::env::var(key).ok()).await
}

/// Same as [`initialize_configuration_hierarchy`] with an injectable environment
pub async fn resolve_settings<F>(
    config: &dyn ConfigPort,
    overrides: &ConfigOverrides,
    env: F,
) -> Result<Settings, DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    // Defaults are seeded by the adapter
    let config_file = load_config_file(config, overrides.config_file.as_deref()).await?;
    load_environment_variables(config, env).await?;
    apply_cli_configuration_overrides(config, overrides).await?;

    config.validate_config().await?;

    let log_level = LogLevel::parse(&config.get_config_or_default("log_level", "info").await?)
        .map_err(|e| DomainError::ConfigFail(e.to_string()))?;
    let json_logs = config.get_config_or_default("log_format", "text").await? == "json";
    let overwrite =
        OverwritePolicy::parse(&config.get_config_or_default("overwrite_policy", "always").await?)
            .map_err(|e| DomainError::ConfigFail(e.to_string()))?;
    let ffmpeg_path = resolve_tool(&config.get_config_or_default("ffmpeg_path", "ffmpeg").await?);
    let ffprobe_path =
        resolve_tool(&config.get_config_or_default("ffprobe_path", "ffprobe").await?);
    let work_dir = config
        .get_config("work_dir")
        .await?
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from);

    let settings = Settings {
        log_level,
        json_logs,
        ffmpeg_path,
        ffprobe_path,
        overwrite,
        work_dir,
        config_file,
    };
    debug!(?settings, "Configuration resolved");
    Ok(settings)
}

/// Load the explicit config file, or `./subtrack.toml` when present
async fn load_config_file(
    config: &dyn ConfigPort,
    explicit: Option<&Path>,
) -> Result<Option<PathBuf>, DomainError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.is_file() {
                debug!("No configuration file found");
                return Ok(None);
            }
            fallback
        }
    };

    info!("Loading configuration from: {}", path.display());
    config.load_config(&path.to_string_lossy()).await?;
    Ok(Some(path))
}

/// Load environment variables and apply to configuration
async fn load_environment_variables<F>(config: &dyn ConfigPort, env: F) -> Result<(), DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_overrides = 0;
    for (env_var, config_key) in ENV_MAPPINGS {
        if let Some(value) = env(env_var) {
            debug!("Found environment override: {} = {}", env_var, value);
            config.set_config(config_key, &value).await?;
            env_overrides += 1;
        }
    }

    if env_overrides > 0 {
        debug!("Applied {} environment variable overrides", env_overrides);
    }

    Ok(())
}

/// Apply CLI argument overrides to configuration
async fn apply_cli_configuration_overrides(
    config: &dyn ConfigPort,
    overrides: &ConfigOverrides,
) -> Result<(), DomainError> {
    if let Some(level) = &overrides.log_level {
        config.set_config("log_level", level).await?;
    }
    if overrides.json_logs {
        config.set_config("log_format", "json").await?;
    }
    if overrides.overwrite {
        config.set_config("overwrite_policy", "always").await?;
    }
    Ok(())
}
