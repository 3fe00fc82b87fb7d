//! Configuration management CLI commands.
//!
//! Provides `config path`, `config list`, `config get`, `config set` and
//! `config init` for viewing and modifying settings from the command line.

use std::path::Path;

use clap::Subcommand;
use flightcheck::config::{ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// List all configuration settings
    List,

    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., rules.altitude_ceiling_m)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., rules.altitude_ceiling_m)
        key: String,

        /// Value to set
        value: String,
    },

    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand against the file at `path`.
pub fn run(command: ConfigCommands, path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(path),
        ConfigCommands::List => run_list(path),
        ConfigCommands::Get { key } => run_get(path, &key),
        ConfigCommands::Set { key, value } => run_set(path, &key, &value),
        ConfigCommands::Init { force } => run_init(path, force),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'flightcheck config list' to see available keys.",
            key
        ))
    })
}

/// Show the configuration file path.
fn run_path(path: &Path) -> Result<(), CliError> {
    println!("{}", path.display());
    Ok(())
}

/// List all configuration settings.
fn run_list(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_or_default(path)?;

    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";
    for key in ConfigKey::all() {
        let section = key.section();
        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }
        println!("  {} = {}", key.key_name(), key.get(&config));
    }

    Ok(())
}

/// Get a configuration value.
fn run_get(path: &Path, key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load_or_default(path)?;
    println!("{}", config_key.get(&config));
    Ok(())
}

/// Set a configuration value.
fn run_set(path: &Path, key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let mut config = ConfigFile::load_or_default(path)?;
    config_key.set(&mut config, value)?;
    config.save_to(path)?;

    println!("Set {} = {}", config_key.name(), config_key.get(&config));
    Ok(())
}

/// Write defaults, refusing to clobber an existing file unless forced.
fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            path.display()
        )));
    }

    ConfigFile::default().save_to(path)?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Edit this file to customize mission rules.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        run_set(&path, "rules.altitude_ceiling_m", "95").unwrap();
        run_set(&path, "analysis.unclosed_lap", "incomplete").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.rules.altitude_ceiling_m, 95.0);
        assert_eq!(
            ConfigKey::AnalysisUnclosedLap.get(&config),
            "incomplete"
        );
    }

    #[test]
    fn test_set_rejects_unknown_key_and_bad_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        assert!(matches!(
            run_set(&path, "rules.wind", "3"),
            Err(CliError::Config(_))
        ));
        assert!(matches!(
            run_set(&path, "rules.home_radius_m", "0"),
            Err(CliError::ConfigFile(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        run_init(&path, false).unwrap();
        assert!(path.exists());
        assert!(run_init(&path, false).is_err());

        run_set(&path, "rules.altitude_ceiling_m", "50").unwrap();
        run_init(&path, true).unwrap();
        assert_eq!(
            ConfigFile::load_from(&path).unwrap(),
            ConfigFile::default()
        );
    }
}
