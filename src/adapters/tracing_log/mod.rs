// Tracing log adapter - Structured logging using tracing crate

use crate::domain::errors::*;
use crate::ports::*;
use async_trait::async_trait;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Tracing log adapter
pub struct TracingLogAdapter {
    current_level: LogLevel,
}

impl TracingLogAdapter {
    /// Create new tracing log adapter filtering below `level`
    pub fn new(level: LogLevel) -> Self {
        Self {
            current_level: level,
        }
    }

    /// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
    ///
    /// Safe to call more than once; later calls are ignored.
    pub fn init(level: LogLevel, json: bool) -> Result<(), DomainError> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.as_filter()))
            .map_err(|e| DomainError::ConfigFail(format!("Invalid log filter: {}", e)))?;

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false);

        // Already initialised is not an error for us
        let _ = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        Ok(())
    }

    /// Check if log level should be logged
    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.current_level
    }
}

impl Default for TracingLogAdapter {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

#[async_trait]
impl LogPort for TracingLogAdapter {
    async fn info(&self, message: &str) {
        if self.should_log(LogLevel::Info) {
            info!("{}", message);
        }
    }

    async fn warn(&self, message: &str) {
        if self.should_log(LogLevel::Warn) {
            warn!("{}", message);
        }
    }

    async fn error(&self, message: &str) {
        if self.should_log(LogLevel::Error) {
            error!("{}", message);
        }
    }

    async fn debug(&self, message: &str) {
        if self.should_log(LogLevel::Debug) {
            debug!("{}", message);
        }
    }
}
