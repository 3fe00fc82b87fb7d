//! Configuration file support.
//!
//! Settings live in an INI file, by default at
//! `<config_dir>/flightcheck/config.ini`:
//!
//! ```ini
//! [rules]
//! altitude_ceiling_m = 120
//! geofence_lat = -35.362
//! geofence_lon = 149.164
//! geofence_radius_m = 50
//! home_radius_m = 15
//! lap_start_hysteresis_m = 5
//! min_airborne_alt_m = 1
//!
//! [analysis]
//! unclosed_lap = drop
//!
//! [logging]
//! level = info
//! file_logging = false
//! ```
//!
//! Every key is optional. Each value is validated by [`ConfigKey::set`],
//! whether it comes from the file or from `flightcheck config set`.

mod file;
mod keys;

pub use file::{config_file_path, ConfigError, ConfigFile, CONFIG_FILE_NAME};
pub use keys::ConfigKey;
