//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use flightcheck::compliance::UnclosedLapPolicy;
use flightcheck::config::{config_file_path, ConfigFile};
use flightcheck::rules::MissionRules;

use crate::error::CliError;

/// Unclosed-lap policy selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum UnclosedArg {
    /// Discard a lap still open at the end of the log
    Drop,
    /// Report it as an incomplete lap
    Incomplete,
}

impl From<UnclosedArg> for UnclosedLapPolicy {
    fn from(arg: UnclosedArg) -> Self {
        match arg {
            UnclosedArg::Drop => UnclosedLapPolicy::Drop,
            UnclosedArg::Incomplete => UnclosedLapPolicy::Incomplete,
        }
    }
}

/// Config file to use: `--config` if given, else the per-user default.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path)
}

/// Load settings, falling back to defaults when the file does not exist.
pub fn load_config(path: &Path) -> Result<ConfigFile, CliError> {
    Ok(ConfigFile::load_or_default(path)?)
}

/// Mission rules from config with CLI overrides applied.
pub fn resolve_rules(config: &ConfigFile, ceiling: Option<f64>) -> Result<MissionRules, CliError> {
    let rules = config.to_rules();
    match ceiling {
        None => Ok(rules),
        Some(c) if c.is_finite() => Ok(rules.with_altitude_ceiling(c)),
        Some(c) => Err(CliError::Config(format!(
            "Invalid altitude ceiling '{}': expected a number of meters",
            c
        ))),
    }
}

/// Unclosed-lap policy: CLI > config.
pub fn resolve_policy(config: &ConfigFile, arg: Option<UnclosedArg>) -> UnclosedLapPolicy {
    arg.map(UnclosedLapPolicy::from)
        .unwrap_or(config.unclosed_lap)
}
