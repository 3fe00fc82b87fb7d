//! Tracing subscriber setup.
//!
//! Human-readable events go to stderr so that stdout stays clean for
//! reports and JSON. File logging is optional and rotates daily.
//!
//! ```ignore
//! let _guard = init_logging(&LoggingConfig::new("debug"))?;
//! ```
//!
//! `RUST_LOG`, when set, takes precedence over the configured level.

use std::path::PathBuf;

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level used when nothing is configured.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Base name of rotated log files.
pub const LOG_FILE_PREFIX: &str = "flightcheck.log";

/// Errors installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The level is not a valid filter directive.
    #[error("Invalid log level '{level}': {message}")]
    Filter { level: String, message: String },

    /// The log directory could not be created.
    #[error("Failed to create log directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A global subscriber is already installed.
    #[error("Failed to install logger: {0}")]
    Init(String),
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Level or `EnvFilter` directive, e.g. `info` or `flightcheck=debug`.
    pub level: String,
    /// Directory for rotated log files, `None` for stderr only.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_LEVEL)
    }
}

impl LoggingConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            log_dir: None,
        }
    }

    /// Also write to daily-rotated files in `dir`.
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Build the event filter: `RUST_LOG` if set, else the configured level.
    pub fn filter(&self) -> Result<EnvFilter, LoggingError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.level).map_err(|e| LoggingError::Filter {
            level: self.level.clone(),
            message: e.to_string(),
        })
    }
}

/// Default directory for log files.
pub fn default_log_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("flightcheck").join("logs");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".flightcheck").join("logs");
    }
    PathBuf::from("./flightcheck_logs")
}

/// Install the global subscriber.
///
/// Returns the file writer guard when file logging is enabled; keep it alive
/// for the lifetime of the program so buffered events are flushed.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = config.filter()?;
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(LocalTime::new(Rfc3339))
        .with_target(false);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::Directory {
                path: dir.clone(),
                source,
            })?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(LocalTime::new(Rfc3339));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    if let Some(dir) = &config.log_dir {
        tracing::debug!(log_dir = %dir.display(), "File logging enabled");
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_is_deterministic() {
        assert_eq!(default_log_dir(), default_log_dir());
        assert!(default_log_dir().ends_with("logs"));
    }

    #[test]
    fn test_builder() {
        let config = LoggingConfig::new("debug").with_log_dir("/tmp/fc");
        assert_eq!(config.level, "debug");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/fc")));
        assert_eq!(LoggingConfig::default().level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = LoggingConfig::new("flightcheck=loud").filter().unwrap_err();
        assert!(matches!(err, LoggingError::Filter { .. }));
    }
}
