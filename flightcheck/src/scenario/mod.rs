//! Synthetic flight generation.
//!
//! Builds sample streams by flying straight legs between waypoints at a
//! fixed sample rate. Used to produce demo `.tlog` files and test flights.
//!
//! # Example
//!
//! ```ignore
//! let samples = FlightScript::new(home)
//!     .fly_to(home.lat, home.lon, 40.0, 5.0)      // climb
//!     .fly_to(home.lat, home.lon + 0.002, 40.0, 8.0)
//!     .fly_to(home.lat, home.lon, 40.0, 8.0)      // back home
//!     .into_samples();
//! ```

use crate::compliance::PositionSample;
use crate::geo::GeoPoint;
use crate::rules::Geofence;

/// Default sample rate (Hz).
pub const DEFAULT_RATE_HZ: u32 = 10;

/// Home of the demo mission (ArduPilot SITL default location).
pub const DEMO_HOME: GeoPoint = GeoPoint::new(-35.363261, 149.165230);

/// Side of the demo mission's square route, in degrees (~200 m).
pub const DEMO_SQUARE_DEG: f64 = 0.002;

/// Cruise altitude of the demo mission (meters).
pub const DEMO_CRUISE_ALT_M: f64 = 40.0;

/// Builder for a synthetic flight.
#[derive(Debug, Clone)]
pub struct FlightScript {
    rate_hz: u32,
    timestamp_ms: u64,
    position: GeoPoint,
    alt: f64,
    samples: Vec<PositionSample>,
}

impl FlightScript {
    /// Start on the ground at `home`, at time zero.
    pub fn new(home: GeoPoint) -> Self {
        Self {
            rate_hz: DEFAULT_RATE_HZ,
            timestamp_ms: 0,
            position: home,
            alt: 0.0,
            samples: Vec::new(),
        }
    }

    /// Set the sample rate. Zero is treated as 1 Hz.
    pub fn with_rate_hz(mut self, rate_hz: u32) -> Self {
        self.rate_hz = rate_hz.max(1);
        self
    }

    /// Fly a straight leg to the target over `duration_s` seconds.
    ///
    /// Emits one sample per tick; the last sample lands exactly on the target.
    pub fn fly_to(mut self, lat: f64, lon: f64, alt: f64, duration_s: f64) -> Self {
        let steps = ((duration_s * f64::from(self.rate_hz)) as usize).max(1);
        let interval_ms = u64::from(1000 / self.rate_hz);
        let start = self.position;
        let start_alt = self.alt;

        for i in 1..=steps {
            let frac = i as f64 / steps as f64;
            self.timestamp_ms += interval_ms;
            self.samples.push(PositionSample::new(
                self.timestamp_ms,
                start.lat + (lat - start.lat) * frac,
                start.lon + (lon - start.lon) * frac,
                start_alt + (alt - start_alt) * frac,
            ));
        }

        self.position = GeoPoint::new(lat, lon);
        self.alt = alt;
        self
    }

    /// Stay at the current position and altitude.
    pub fn hold(self, duration_s: f64) -> Self {
        let (lat, lon, alt) = (self.position.lat, self.position.lon, self.alt);
        self.fly_to(lat, lon, alt, duration_s)
    }

    /// Samples so far.
    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }

    /// Finish and take the samples.
    pub fn into_samples(self) -> Vec<PositionSample> {
        self.samples
    }
}

/// The three-lap demo mission.
///
/// 1. Clean square lap at 40 m.
/// 2. Same square, climbing to 135 m on the second leg (altitude violation).
/// 3. Detour through the default no-fly zone center (zone violation).
///
/// Takes off and lands at [`DEMO_HOME`].
pub fn demo_mission() -> Vec<PositionSample> {
    let home = DEMO_HOME;
    let d = DEMO_SQUARE_DEG;
    let alt = DEMO_CRUISE_ALT_M;
    let nfz = Geofence::default().center;

    FlightScript::new(home)
        // Takeoff
        .fly_to(home.lat, home.lon, alt, 5.0)
        // Lap 1: clean
        .fly_to(home.lat, home.lon + d, alt, 8.0)
        .fly_to(home.lat + d, home.lon + d, alt, 8.0)
        .fly_to(home.lat + d, home.lon, alt, 8.0)
        .fly_to(home.lat, home.lon, alt, 8.0)
        .hold(2.0)
        // Lap 2: climbs through the ceiling
        .fly_to(home.lat, home.lon + d, alt, 8.0)
        .fly_to(home.lat + d, home.lon + d, 135.0, 8.0)
        .fly_to(home.lat + d, home.lon, 130.0, 8.0)
        .fly_to(home.lat, home.lon, alt, 8.0)
        .hold(2.0)
        // Lap 3: crosses the no-fly zone
        .fly_to(home.lat, home.lon + d, alt, 8.0)
        .fly_to(home.lat + d, home.lon + d, alt, 8.0)
        .fly_to(nfz.lat, nfz.lon, alt, 10.0)
        .fly_to(home.lat, home.lon, alt, 10.0)
        // Land
        .fly_to(home.lat, home.lon, 0.0, 5.0)
        .into_samples()
}
