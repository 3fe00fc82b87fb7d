//! Input and reference types for the compliance engine.

use serde::Serialize;

use crate::geo::GeoPoint;

/// A single decoded position fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionSample {
    /// Monotonic time since vehicle boot (milliseconds).
    pub timestamp_ms: u64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Altitude relative to launch (meters).
    pub alt: f64,
}

impl PositionSample {
    /// Create a new sample.
    pub fn new(timestamp_ms: u64, lat: f64, lon: f64, alt: f64) -> Self {
        Self {
            timestamp_ms,
            lat,
            lon,
            alt,
        }
    }

    /// Horizontal position of this sample.
    #[inline]
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// The locked home reference of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HomePosition {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl HomePosition {
    /// Horizontal position of home.
    #[inline]
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

impl From<&PositionSample> for HomePosition {
    fn from(sample: &PositionSample) -> Self {
        Self {
            lat: sample.lat,
            lon: sample.lon,
        }
    }
}
