// TOML config adapter - Configuration management using TOML files

use crate::domain::errors::*;
use crate::ports::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Table holding all keys in a config file
pub const CONFIG_SECTION: &str = "subtrack";

/// Config file picked up from the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "subtrack.toml";

/// Built-in defaults; `work_dir` is absent so the system temp directory is used
const DEFAULTS: &[(&str, &str)] = &[
    ("log_level", "info"),
    ("log_format", "text"),
    ("ffmpeg_path", "ffmpeg"),
    ("ffprobe_path", "ffprobe"),
    ("overwrite_policy", "always"),
];

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config: Arc<RwLock<HashMap<String, String>>>,
    config_file_path: Arc<RwLock<Option<PathBuf>>>,
}

fn poisoned<T>(_: T) -> DomainError {
    DomainError::ConfigFail("Configuration lock poisoned".to_string())
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter seeded with defaults
    pub fn new() -> Self {
        let config = DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            config: Arc::new(RwLock::new(config)),
            config_file_path: Arc::new(RwLock::new(None)),
        }
    }

    /// Path of the file last loaded, if any
    pub fn loaded_from(&self) -> Result<Option<PathBuf>, DomainError> {
        Ok(self.config_file_path.read().map_err(poisoned)?.clone())
    }

    /// Deserialize config from TOML string
    fn deserialize_config(&self, toml_content: &str) -> Result<(), DomainError> {
        let parsed: toml::Value = toml::from_str(toml_content)
            .map_err(|e| DomainError::ConfigFail(format!("Failed to parse TOML config: {}", e)))?;

        let mut config = self.config.write().map_err(poisoned)?;
        if let Some(table) = parsed.get(CONFIG_SECTION).and_then(|s| s.as_table()) {
            for (key, value) in table {
                let value = match value {
                    toml::Value::String(s) => s.clone(),
                    toml::Value::Boolean(b) => b.to_string(),
                    toml::Value::Integer(i) => i.to_string(),
                    other => {
                        return Err(DomainError::ConfigFail(format!(
                            "Unsupported value for {}: {}",
                            key, other
                        )))
                    }
                };
                config.insert(key.clone(), value);
            }
        }

        Ok(())
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigPort for TomlConfigAdapter {
    async fn get_config(&self, key: &str) -> Result<Option<String>, DomainError> {
        let config = self.config.read().map_err(poisoned)?;
        Ok(config.get(key).cloned())
    }

    async fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, DomainError> {
        let config = self.config.read().map_err(poisoned)?;
        Ok(config
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string()))
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut config = self.config.write().map_err(poisoned)?;
        config.insert(key.to_string(), value.to_string());
        tracing::debug!("Set config {} = {}", key, value);
        Ok(())
    }

    async fn load_config(&self, file_path: &str) -> Result<(), DomainError> {
        let path = PathBuf::from(file_path);

        if !path.is_file() {
            return Err(DomainError::ConfigFail(format!(
                "Config file does not exist: {}",
                file_path
            )));
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to read config file: {}", e)))?;

        self.deserialize_config(&content)?;
        *self.config_file_path.write().map_err(poisoned)? = Some(path);
        tracing::debug!(file = file_path, "Loaded configuration");

        Ok(())
    }

    async fn validate_config(&self) -> Result<(), DomainError> {
        let config = self.config.read().map_err(poisoned)?;

        if let Some(log_level) = config.get("log_level") {
            LogLevel::parse(log_level)
                .map_err(|e| DomainError::ConfigFail(e.to_string()))?;
        }

        if let Some(format) = config.get("log_format") {
            if !matches!(format.as_str(), "text" | "json") {
                return Err(DomainError::ConfigFail(format!(
                    "Invalid log_format: {}. Valid formats: text, json",
                    format
                )));
            }
        }

        if let Some(policy) = config.get("overwrite_policy") {
            if !matches!(policy.as_str(), "always" | "never") {
                return Err(DomainError::ConfigFail(format!(
                    "Invalid overwrite_policy: {}. Valid policies: always, never",
                    policy
                )));
            }
        }

        for key in ["ffmpeg_path", "ffprobe_path"] {
            if config.get(key).is_some_and(|v| v.trim().is_empty()) {
                return Err(DomainError::ConfigFail(format!("{} must not be empty", key)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_defaults() {
        let adapter = TomlConfigAdapter::new();
        assert_eq!(adapter.get_config("log_level").await.unwrap().as_deref(), Some("info"));
        assert_eq!(
            adapter.get_config("overwrite_policy").await.unwrap().as_deref(),
            Some("always")
        );
        assert_eq!(adapter.get_config("work_dir").await.unwrap(), None);
        assert_eq!(
            adapter.get_config_or_default("work_dir", "/tmp").await.unwrap(),
            "/tmp"
        );
        assert!(adapter.validate_config().await.is_ok());
    }

    #[tokio::test]
    async fn test_load_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[subtrack]\nlog_level = \"debug\"\nffmpeg_path = \"/opt/ffmpeg/bin/ffmpeg\"\n\n[other]\nlog_level = \"error\""
        )
        .unwrap();

        let adapter = TomlConfigAdapter::new();
        adapter
            .load_config(file.path().to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(adapter.get_config("log_level").await.unwrap().as_deref(), Some("debug"));
        assert_eq!(
            adapter.get_config("ffmpeg_path").await.unwrap().as_deref(),
            Some("/opt/ffmpeg/bin/ffmpeg")
        );
        assert_eq!(
            adapter.get_config("ffprobe_path").await.unwrap().as_deref(),
            Some("ffprobe")
        );
        assert_eq!(adapter.loaded_from().unwrap().as_deref(), Some(file.path()));
    }

    #[tokio::test]
    async fn test_load_missing_and_malformed() {
        let adapter = TomlConfigAdapter::new();
        assert!(matches!(
            adapter.load_config("/no/such/subtrack.toml").await,
            Err(DomainError::ConfigFail(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[subtrack\nlog_level = ").unwrap();
        assert!(matches!(
            adapter.load_config(file.path().to_str().unwrap()).await,
            Err(DomainError::ConfigFail(_))
        ));
    }

    #[tokio::test]
    async fn test_validate_rejects_bad_values() {
        let adapter = TomlConfigAdapter::new();
        adapter.set_config("overwrite_policy", "prompt").await.unwrap();
        assert!(adapter.validate_config().await.is_err());

        adapter.set_config("overwrite_policy", "never").await.unwrap();
        adapter.set_config("log_format", "xml").await.unwrap();
        assert!(adapter.validate_config().await.is_err());

        adapter.set_config("log_format", "json").await.unwrap();
        adapter.set_config("log_level", "chatty").await.unwrap();
        assert!(matches!(
            adapter.validate_config().await,
            Err(DomainError::ConfigFail(_))
        ));
    }
}
