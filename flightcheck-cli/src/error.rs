//! CLI error type.

use thiserror::Error;

use flightcheck::config::ConfigError;
use flightcheck::logging::LoggingError;
use flightcheck::plot::PlotError;
use flightcheck::report::ReportError;
use flightcheck::tlog::TlogError;

/// Any failure that ends a command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid settings given on the command line.
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error(transparent)]
    Tlog(#[from] TlogError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
