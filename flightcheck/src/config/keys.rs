//! Typed access to individual settings by `section.key` name.

use std::str::FromStr;

use super::file::{ConfigError, ConfigFile};
use crate::compliance::UnclosedLapPolicy;

/// A single configurable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    RulesAltitudeCeiling,
    RulesGeofenceLat,
    RulesGeofenceLon,
    RulesGeofenceRadius,
    RulesHomeRadius,
    RulesLapStartHysteresis,
    RulesMinAirborneAlt,
    AnalysisUnclosedLap,
    LoggingLevel,
    LoggingFileLogging,
}

const ALL_KEYS: [ConfigKey; 10] = [
    ConfigKey::RulesAltitudeCeiling,
    ConfigKey::RulesGeofenceLat,
    ConfigKey::RulesGeofenceLon,
    ConfigKey::RulesGeofenceRadius,
    ConfigKey::RulesHomeRadius,
    ConfigKey::RulesLapStartHysteresis,
    ConfigKey::RulesMinAirborneAlt,
    ConfigKey::AnalysisUnclosedLap,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingFileLogging,
];

impl ConfigKey {
    /// Every key, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    /// Full dotted name, e.g. `rules.home_radius_m`.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// INI section.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::RulesAltitudeCeiling
            | ConfigKey::RulesGeofenceLat
            | ConfigKey::RulesGeofenceLon
            | ConfigKey::RulesGeofenceRadius
            | ConfigKey::RulesHomeRadius
            | ConfigKey::RulesLapStartHysteresis
            | ConfigKey::RulesMinAirborneAlt => "rules",
            ConfigKey::AnalysisUnclosedLap => "analysis",
            ConfigKey::LoggingLevel | ConfigKey::LoggingFileLogging => "logging",
        }
    }

    /// Key within the section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::RulesAltitudeCeiling => "altitude_ceiling_m",
            ConfigKey::RulesGeofenceLat => "geofence_lat",
            ConfigKey::RulesGeofenceLon => "geofence_lon",
            ConfigKey::RulesGeofenceRadius => "geofence_radius_m",
            ConfigKey::RulesHomeRadius => "home_radius_m",
            ConfigKey::RulesLapStartHysteresis => "lap_start_hysteresis_m",
            ConfigKey::RulesMinAirborneAlt => "min_airborne_alt_m",
            ConfigKey::AnalysisUnclosedLap => "unclosed_lap",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingFileLogging => "file_logging",
        }
    }

    /// Current value as written to the file.
    pub fn get(&self, config: &ConfigFile) -> String {
        let rules = &config.rules;
        match self {
            ConfigKey::RulesAltitudeCeiling => rules.altitude_ceiling_m.to_string(),
            ConfigKey::RulesGeofenceLat => rules.geofence.center.lat.to_string(),
            ConfigKey::RulesGeofenceLon => rules.geofence.center.lon.to_string(),
            ConfigKey::RulesGeofenceRadius => rules.geofence.radius_m.to_string(),
            ConfigKey::RulesHomeRadius => rules.home_radius_m.to_string(),
            ConfigKey::RulesLapStartHysteresis => rules.lap_start_hysteresis_m.to_string(),
            ConfigKey::RulesMinAirborneAlt => rules.min_airborne_alt_m.to_string(),
            ConfigKey::AnalysisUnclosedLap => config.unclosed_lap.to_string(),
            ConfigKey::LoggingLevel => config.log_level.clone(),
            ConfigKey::LoggingFileLogging => config.file_logging.to_string(),
        }
    }

    /// Validate `value` and store it.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let rules = &mut config.rules;
        match self {
            ConfigKey::RulesAltitudeCeiling => {
                rules.altitude_ceiling_m = self.parse_number(value)?;
            }
            ConfigKey::RulesGeofenceLat => {
                rules.geofence.center.lat = self.parse_in_range(value, -90.0, 90.0)?;
            }
            ConfigKey::RulesGeofenceLon => {
                rules.geofence.center.lon = self.parse_in_range(value, -180.0, 180.0)?;
            }
            ConfigKey::RulesGeofenceRadius => {
                rules.geofence.radius_m = self.parse_positive(value)?;
            }
            ConfigKey::RulesHomeRadius => {
                rules.home_radius_m = self.parse_positive(value)?;
            }
            ConfigKey::RulesLapStartHysteresis => {
                rules.lap_start_hysteresis_m = self.parse_non_negative(value)?;
            }
            ConfigKey::RulesMinAirborneAlt => {
                rules.min_airborne_alt_m = self.parse_number(value)?;
            }
            ConfigKey::AnalysisUnclosedLap => {
                config.unclosed_lap = value
                    .parse::<UnclosedLapPolicy>()
                    .map_err(|reason| self.invalid(value, reason))?;
            }
            ConfigKey::LoggingLevel => {
                let level = value.trim();
                if level.is_empty() {
                    return Err(self.invalid(value, "must not be empty"));
                }
                config.log_level = level.to_string();
            }
            ConfigKey::LoggingFileLogging => {
                config.file_logging = self.parse_bool(value)?;
            }
        }
        Ok(())
    }

    fn invalid(&self, value: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    fn parse_number(&self, value: &str) -> Result<f64, ConfigError> {
        match value.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(self.invalid(value, "expected a number")),
        }
    }

    fn parse_positive(&self, value: &str) -> Result<f64, ConfigError> {
        let n = self.parse_number(value)?;
        if n > 0.0 {
            Ok(n)
        } else {
            Err(self.invalid(value, "must be greater than zero"))
        }
    }

    fn parse_non_negative(&self, value: &str) -> Result<f64, ConfigError> {
        let n = self.parse_number(value)?;
        if n >= 0.0 {
            Ok(n)
        } else {
            Err(self.invalid(value, "must not be negative"))
        }
    }

    fn parse_in_range(&self, value: &str, min: f64, max: f64) -> Result<f64, ConfigError> {
        let n = self.parse_number(value)?;
        if (min..=max).contains(&n) {
            Ok(n)
        } else {
            Err(self.invalid(value, format!("must be between {} and {}", min, max)))
        }
    }

    fn parse_bool(&self, value: &str) -> Result<bool, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(self.invalid(value, "expected true or false")),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        assert_eq!(
            "rules.home_radius_m".parse::<ConfigKey>().unwrap(),
            ConfigKey::RulesHomeRadius
        );
        assert_eq!(
            "Analysis.Unclosed_Lap".parse::<ConfigKey>().unwrap(),
            ConfigKey::AnalysisUnclosedLap
        );
        assert!(matches!(
            "rules.nope".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_every_key_round_trips_its_name() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
            assert_eq!(key.to_string(), key.name());
        }
    }

    #[test]
    fn test_get_defaults() {
        let config = ConfigFile::default();
        assert_eq!(ConfigKey::RulesAltitudeCeiling.get(&config), "120");
        assert_eq!(ConfigKey::RulesGeofenceLat.get(&config), "-35.362");
        assert_eq!(ConfigKey::AnalysisUnclosedLap.get(&config), "drop");
        assert_eq!(ConfigKey::LoggingFileLogging.get(&config), "false");
    }

    #[test]
    fn test_set_values() {
        let mut config = ConfigFile::default();

        ConfigKey::RulesGeofenceRadius.set(&mut config, "75.5").unwrap();
        ConfigKey::AnalysisUnclosedLap.set(&mut config, "Incomplete").unwrap();
        ConfigKey::LoggingFileLogging.set(&mut config, "yes").unwrap();

        assert_eq!(config.rules.geofence.radius_m, 75.5);
        assert_eq!(config.unclosed_lap, UnclosedLapPolicy::Incomplete);
        assert!(config.file_logging);
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = ConfigFile::default();

        assert!(ConfigKey::RulesHomeRadius.set(&mut config, "-1").is_err());
        assert!(ConfigKey::RulesHomeRadius.set(&mut config, "NaN").is_err());
        assert!(ConfigKey::RulesLapStartHysteresis.set(&mut config, "-0.5").is_err());
        assert!(ConfigKey::RulesGeofenceLat.set(&mut config, "91").is_err());
        assert!(ConfigKey::AnalysisUnclosedLap.set(&mut config, "keep").is_err());
        assert!(ConfigKey::LoggingFileLogging.set(&mut config, "maybe").is_err());
        assert!(ConfigKey::LoggingLevel.set(&mut config, "  ").is_err());

        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_zero_hysteresis_is_allowed() {
        let mut config = ConfigFile::default();
        ConfigKey::RulesLapStartHysteresis.set(&mut config, "0").unwrap();
        assert_eq!(config.rules.lap_start_distance_m(), 15.0);
    }
}
