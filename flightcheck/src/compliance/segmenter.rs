//! Lap segmentation state machine.
//!
//! # State Machine
//!
//! ```text
//!          distance > home_radius + hysteresis
//!   Idle ───────────────────────────────────────► InLap(LapState)
//!    ▲                                              │  │
//!    │       distance < home_radius                 │  │ every sample:
//!    └──────────────────────────────────────────────┘  │   max altitude
//!              (emit LapRecord)                         │   rule checks
//!                                                       ◄┘
//! ```
//!
//! Opening uses the wider threshold so that noise around the home radius
//! cannot start a lap and immediately close it again. Closing uses the
//! tighter threshold so a genuine return is detected promptly.
//!
//! The open check only runs in `Idle` and the close check only in `InLap`,
//! so there is never more than one lap open.

use std::mem;

use tracing::info;

use super::lap::{LapCompletion, LapRecord, LapState};
use super::types::{HomePosition, PositionSample};
use super::violation::ViolationDetector;
use crate::geo::distance;
use crate::rules::MissionRules;

/// Segmenter state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SegmenterState {
    /// No lap open.
    #[default]
    Idle,
    /// A lap is open.
    InLap(LapState),
}

impl SegmenterState {
    /// Short name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmenterState::Idle => "Idle",
            SegmenterState::InLap(_) => "InLap",
        }
    }
}

impl std::fmt::Display for SegmenterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What happened to lap state while processing one sample.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// No lap opened or closed.
    None,
    /// A new lap opened on this sample.
    Opened { lap_id: u32 },
    /// The open lap returned home on this sample.
    Closed(LapRecord),
}

/// Splits a flight into laps around a home reference.
#[derive(Debug)]
pub struct LapSegmenter {
    state: SegmenterState,
    laps_opened: u32,
    home_radius_m: f64,
    lap_start_distance_m: f64,
    detector: ViolationDetector,
}

impl LapSegmenter {
    /// Create an idle segmenter.
    pub fn new(rules: &MissionRules) -> Self {
        Self {
            state: SegmenterState::Idle,
            laps_opened: 0,
            home_radius_m: rules.home_radius_m,
            lap_start_distance_m: rules.lap_start_distance_m(),
            detector: ViolationDetector::new(rules),
        }
    }

    /// Current state.
    pub fn state(&self) -> &SegmenterState {
        &self.state
    }

    /// Number of laps opened so far.
    pub fn laps_opened(&self) -> u32 {
        self.laps_opened
    }

    /// The open lap, if any.
    pub fn open_lap(&self) -> Option<&LapState> {
        match &self.state {
            SegmenterState::InLap(lap) => Some(lap),
            SegmenterState::Idle => None,
        }
    }

    /// Process one sample against the locked home.
    pub fn update(&mut self, sample: &PositionSample, home: &HomePosition) -> Transition {
        let dist_to_home = distance(sample.point(), home.point());
        let mut transition = Transition::None;

        if matches!(self.state, SegmenterState::Idle) && dist_to_home > self.lap_start_distance_m
        {
            self.laps_opened += 1;
            let lap_id = self.laps_opened;
            self.state = SegmenterState::InLap(LapState::open(lap_id, sample.timestamp_ms));
            info!(
                lap_id,
                dist_to_home_m = dist_to_home,
                timestamp_ms = sample.timestamp_ms,
                "Lap started"
            );
            transition = Transition::Opened { lap_id };
        }

        let returned_home = match &mut self.state {
            SegmenterState::InLap(lap) => {
                lap.observe(sample.alt);
                self.detector.evaluate(lap, sample);
                dist_to_home < self.home_radius_m
            }
            SegmenterState::Idle => false,
        };

        if returned_home {
            if let Some(record) = self.take_open_lap(sample.timestamp_ms, LapCompletion::Closed) {
                info!(
                    lap_id = record.lap_id,
                    valid = record.is_valid,
                    max_alt_m = record.max_alt,
                    reason = %record.fail_reason,
                    "Lap finished"
                );
                transition = Transition::Closed(record);
            }
        }

        transition
    }

    /// Close out the open lap, if any, returning its record.
    ///
    /// Leaves the segmenter idle.
    pub fn take_open_lap(
        &mut self,
        ended_at_ms: u64,
        completion: LapCompletion,
    ) -> Option<LapRecord> {
        match mem::take(&mut self.state) {
            SegmenterState::InLap(lap) => Some(lap.into_record(ended_at_ms, completion)),
            SegmenterState::Idle => None,
        }
    }
}
