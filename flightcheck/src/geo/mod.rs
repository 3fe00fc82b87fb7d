//! Geodesy helpers.
//!
//! Great-circle distance between geographic coordinates, plus a small-area
//! offset used for drawing zones and scripting synthetic flights.
//!
//! All angles are taken in degrees and converted to radians internally.
//! Distances are in meters on a spherical Earth of radius [`EARTH_RADIUS_M`].

use serde::Serialize;

/// Mean Earth radius used by the haversine formula (meters).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// Haversine great-circle distance between two points (meters).
///
/// Total and symmetric; `distance(a, a) == 0`.
#[inline]
pub fn distance(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let phi1 = p1.lat.to_radians();
    let phi2 = p2.lat.to_radians();
    let delta_phi = (p2.lat - p1.lat).to_radians();
    let delta_lambda = (p2.lon - p1.lon).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 near antipodes
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Offset a point by a north/east displacement in meters.
///
/// Flat-earth approximation; only valid for displacements of a few
/// kilometers away from the poles.
pub fn offset(origin: GeoPoint, north_m: f64, east_m: f64) -> GeoPoint {
    let dlat = (north_m / EARTH_RADIUS_M).to_degrees();
    let dlon = (east_m / (EARTH_RADIUS_M * origin.lat.to_radians().cos())).to_degrees();
    GeoPoint::new(origin.lat + dlat, origin.lon + dlon)
}

/// Approximate a circle of `radius_m` around `center` as a closed polygon.
///
/// Returns `segments + 1` points; the last repeats the first.
pub fn circle(center: GeoPoint, radius_m: f64, segments: usize) -> Vec<GeoPoint> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let theta = (i as f64 / segments as f64) * std::f64::consts::TAU;
            offset(center, radius_m * theta.sin(), radius_m * theta.cos())
        })
        .collect()
}
