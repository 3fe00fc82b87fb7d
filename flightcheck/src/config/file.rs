//! Loading and saving `config.ini`.

use std::io;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::{debug, warn};

use super::keys::ConfigKey;
use crate::compliance::UnclosedLapPolicy;
use crate::logging::{default_log_dir, LoggingConfig, DEFAULT_LOG_LEVEL};
use crate::rules::MissionRules;

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors reading, writing or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid INI.
    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A value failed validation.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// The key is not a known `section.key` name.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// Path of the default configuration file.
pub fn config_file_path() -> PathBuf {
    let base = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("flightcheck").join(CONFIG_FILE_NAME)
}

/// All user settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Mission rules.
    pub rules: MissionRules,
    /// What to do with a lap still open at end of log.
    pub unclosed_lap: UnclosedLapPolicy,
    /// Log level or filter directive.
    pub log_level: String,
    /// Also write log files.
    pub file_logging: bool,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            rules: MissionRules::default(),
            unclosed_lap: UnclosedLapPolicy::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            file_logging: false,
        }
    }
}

impl ConfigFile {
    /// Load from the default path, or defaults if the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_default(config_file_path())
    }

    /// Load from `path`, or defaults if the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load from `path`. Missing keys keep their defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(e) => ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        let mut config = Self::default();
        for (section, properties) in ini.iter() {
            let Some(section) = section else {
                continue;
            };
            for (key, value) in properties.iter() {
                match format!("{}.{}", section, key).parse::<ConfigKey>() {
                    Ok(config_key) => config_key.set(&mut config, value)?,
                    Err(_) => warn!(section, key, "Ignoring unknown config key"),
                }
            }
        }

        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Save to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(config_file_path())
    }

    /// Save every setting to `path`, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini.write_to_file(path).map_err(io_error)
    }

    /// Mission rules for analysis.
    pub fn to_rules(&self) -> MissionRules {
        self.rules
    }

    /// Logging setup derived from the `[logging]` section.
    pub fn to_logging(&self) -> LoggingConfig {
        let config = LoggingConfig::new(self.log_level.clone());
        if self.file_logging {
            config.with_log_dir(default_log_dir())
        } else {
            config
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_config_path_ends_with_file_name() {
        let path = config_file_path();
        assert!(path.ends_with("flightcheck/config.ini"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFile::load_or_default(dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigFile::load_from(dir.path().join("absent.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.rules = config.rules.with_altitude_ceiling(90.0).with_home_radius(10.0);
        config.unclosed_lap = UnclosedLapPolicy::Incomplete;
        config.log_level = "debug".to_string();
        config.file_logging = true;
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[rules]\naltitude_ceiling_m = 80\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.rules.altitude_ceiling_m, 80.0);
        assert_eq!(config.rules.home_radius_m, 15.0);
        assert_eq!(config.unclosed_lap, UnclosedLapPolicy::Drop);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[rules]\nwind_limit = 12\n[extra]\nfoo = bar\n").unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_malformed_number_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[rules]\naltitude_ceiling_m = high\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "rules.altitude_ceiling_m");
                assert_eq!(value, "high");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_positive_radius_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[rules]\ngeofence_radius_m = 0\n").unwrap();

        assert!(matches!(
            ConfigFile::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_to_logging() {
        let mut config = ConfigFile::default();
        assert!(config.to_logging().log_dir.is_none());

        config.file_logging = true;
        config.log_level = "warn".to_string();
        let logging = config.to_logging();
        assert_eq!(logging.level, "warn");
        assert!(logging.log_dir.is_some());
    }
}
