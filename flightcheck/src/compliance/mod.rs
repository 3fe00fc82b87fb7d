//! Flight compliance state machine.
//!
//! Consumes a time-ordered stream of position samples and produces a locked
//! home reference, a lap segmentation of the flight, and a pass/fail verdict
//! per lap with a sticky first-cause reason.
//!
//! # Architecture
//!
//! ```text
//! PositionSample ──► HomeLocator ──► LapSegmenter ──► ViolationDetector
//!   (alt > 1 m)      (lock once)     Idle | InLap      (first cause)
//!                                        │
//!                                        ▼ on return home
//!                                   LapAggregator ──► FlightReport
//!                                  (LapRecord list)   (finalize)
//! ```
//!
//! [`ComplianceEngine`] owns all mutable state and is the only entry point.
//! Processing is a single-threaded fold: feed samples in timestamp order,
//! then call [`ComplianceEngine::finalize`].
//!
//! # Example
//!
//! ```ignore
//! use flightcheck::compliance::{analyze, UnclosedLapPolicy};
//! use flightcheck::rules::MissionRules;
//!
//! let report = analyze(samples, MissionRules::default(), UnclosedLapPolicy::Drop);
//! for lap in &report.laps {
//!     println!("LAP #{} {}", lap.lap_id, lap.fail_reason);
//! }
//! ```

mod aggregator;
mod engine;
mod home;
mod lap;
mod segmenter;
mod types;
mod violation;

pub use aggregator::{FlightSummary, LapAggregator};
pub use engine::{analyze, ComplianceEngine, FlightReport, UnclosedLapPolicy};
pub use home::HomeLocator;
pub use lap::{FailReason, LapCompletion, LapRecord, LapState};
pub use segmenter::{LapSegmenter, SegmenterState, Transition};
pub use types::{HomePosition, PositionSample};
pub use violation::ViolationDetector;
