//! Mission rule parameters.
//!
//! The rule set is fixed in shape: one altitude ceiling and one circular
//! no-fly zone. Only the values are configurable.
//!
//! ```text
//!  distance to home
//!  ───────────────────────────────────────────────►
//!  0 m            15 m          20 m
//!  │   home zone   │  hysteresis  │   away
//!  │  (lap closes) │    band      │ (lap opens)
//! ```

use serde::Serialize;

use crate::geo::{distance, GeoPoint};

/// Default altitude ceiling (meters above launch).
pub const DEFAULT_ALTITUDE_CEILING_M: f64 = 120.0;

/// Default no-fly zone center latitude.
pub const DEFAULT_GEOFENCE_LAT: f64 = -35.362000;

/// Default no-fly zone center longitude.
pub const DEFAULT_GEOFENCE_LON: f64 = 149.164000;

/// Default no-fly zone radius (meters).
pub const DEFAULT_GEOFENCE_RADIUS_M: f64 = 50.0;

/// Default distance to home below which an open lap closes (meters).
pub const DEFAULT_HOME_RADIUS_M: f64 = 15.0;

/// Default extra distance beyond the home radius required to open a lap (meters).
pub const DEFAULT_LAP_START_HYSTERESIS_M: f64 = 5.0;

/// Default altitude at or below which samples are treated as on the ground.
pub const DEFAULT_MIN_AIRBORNE_ALT_M: f64 = 1.0;

/// Circular no-fly zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geofence {
    /// Zone center.
    pub center: GeoPoint,
    /// Zone radius in meters.
    pub radius_m: f64,
}

impl Geofence {
    /// Create a new zone.
    pub const fn new(center: GeoPoint, radius_m: f64) -> Self {
        Self { center, radius_m }
    }

    /// Whether the point lies strictly inside the zone.
    #[inline]
    pub fn contains(&self, point: GeoPoint) -> bool {
        distance(point, self.center) < self.radius_m
    }
}

impl Default for Geofence {
    fn default() -> Self {
        Self::new(
            GeoPoint::new(DEFAULT_GEOFENCE_LAT, DEFAULT_GEOFENCE_LON),
            DEFAULT_GEOFENCE_RADIUS_M,
        )
    }
}

/// Complete rule configuration for an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MissionRules {
    /// Altitude ceiling in meters.
    pub altitude_ceiling_m: f64,
    /// No-fly zone.
    pub geofence: Geofence,
    /// Lap close threshold (meters from home).
    pub home_radius_m: f64,
    /// Hysteresis added to the home radius for lap opening (meters).
    pub lap_start_hysteresis_m: f64,
    /// Samples at or below this altitude are ignored.
    pub min_airborne_alt_m: f64,
}

impl Default for MissionRules {
    fn default() -> Self {
        Self {
            altitude_ceiling_m: DEFAULT_ALTITUDE_CEILING_M,
            geofence: Geofence::default(),
            home_radius_m: DEFAULT_HOME_RADIUS_M,
            lap_start_hysteresis_m: DEFAULT_LAP_START_HYSTERESIS_M,
            min_airborne_alt_m: DEFAULT_MIN_AIRBORNE_ALT_M,
        }
    }
}

impl MissionRules {
    /// Distance from home beyond which a new lap opens.
    pub fn lap_start_distance_m(&self) -> f64 {
        self.home_radius_m + self.lap_start_hysteresis_m
    }

    /// Set the altitude ceiling.
    pub fn with_altitude_ceiling(mut self, meters: f64) -> Self {
        self.altitude_ceiling_m = meters;
        self
    }

    /// Set the no-fly zone.
    pub fn with_geofence(mut self, geofence: Geofence) -> Self {
        self.geofence = geofence;
        self
    }

    /// Set the home radius.
    pub fn with_home_radius(mut self, meters: f64) -> Self {
        self.home_radius_m = meters;
        self
    }

    /// Set the lap start hysteresis.
    pub fn with_lap_start_hysteresis(mut self, meters: f64) -> Self {
        self.lap_start_hysteresis_m = meters;
        self
    }

    /// Set the minimum airborne altitude.
    pub fn with_min_airborne_alt(mut self, meters: f64) -> Self {
        self.min_airborne_alt_m = meters;
        self
    }
}
