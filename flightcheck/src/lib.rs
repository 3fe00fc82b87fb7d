//! FlightCheck - mission compliance analysis for recorded drone flights
//!
//! This library reads MAVLink telemetry logs, splits the flight into laps
//! around the home point, and judges each lap against an altitude ceiling
//! and a circular no-fly zone.
//!
//! ```ignore
//! use flightcheck::compliance::{analyze, UnclosedLapPolicy};
//! use flightcheck::rules::MissionRules;
//! use flightcheck::tlog::read_tlog;
//!
//! let (samples, _stats) = read_tlog("flight.tlog")?;
//! let report = analyze(samples, MissionRules::default(), UnclosedLapPolicy::Drop);
//! print!("{}", flightcheck::report::render_text(&report));
//! ```

pub mod compliance;
pub mod config;
pub mod geo;
pub mod logging;
pub mod plot;
pub mod report;
pub mod rules;
pub mod scenario;
pub mod tlog;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use compliance::{analyze, ComplianceEngine, FlightReport, UnclosedLapPolicy};
pub use rules::MissionRules;
