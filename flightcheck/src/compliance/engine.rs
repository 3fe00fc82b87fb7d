//! Compliance engine: the single entry point over a sample stream.

use std::str::FromStr;

use serde::Serialize;
use tracing::{info, warn};

use super::aggregator::{FlightSummary, LapAggregator};
use super::home::HomeLocator;
use super::lap::{LapCompletion, LapRecord};
use super::segmenter::{LapSegmenter, Transition};
use super::types::{HomePosition, PositionSample};
use crate::rules::MissionRules;

/// What to do with a lap still open when the sample stream ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnclosedLapPolicy {
    /// Discard the open lap. It produces no record.
    #[default]
    Drop,
    /// Emit the open lap as an incomplete record.
    Incomplete,
}

impl UnclosedLapPolicy {
    /// Config/CLI spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnclosedLapPolicy::Drop => "drop",
            UnclosedLapPolicy::Incomplete => "incomplete",
        }
    }
}

impl std::fmt::Display for UnclosedLapPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UnclosedLapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Ok(UnclosedLapPolicy::Drop),
            "incomplete" => Ok(UnclosedLapPolicy::Incomplete),
            other => Err(format!(
                "unknown unclosed lap policy '{}' (expected 'drop' or 'incomplete')",
                other
            )),
        }
    }
}

/// Finished analysis of one flight.
///
/// Owned by the caller; the report and plot layers read it.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightReport {
    /// Locked home, `None` when no airborne sample was seen.
    pub home: Option<HomePosition>,
    /// Lap records in lap order.
    pub laps: Vec<LapRecord>,
    /// Totals over `laps`.
    pub summary: FlightSummary,
    /// Airborne samples in arrival order.
    pub samples: Vec<PositionSample>,
    /// Rules the flight was judged against.
    pub rules: MissionRules,
}

impl FlightReport {
    /// Whether any airborne sample was seen.
    ///
    /// Callers must check this before charting.
    pub fn has_data(&self) -> bool {
        !self.samples.is_empty()
    }
}

/// Folds a time-ordered sample stream into lap verdicts.
///
/// # Example
///
/// ```ignore
/// let mut engine = ComplianceEngine::new(MissionRules::default());
/// for sample in samples {
///     engine.ingest(sample);
/// }
/// let report = engine.finalize(UnclosedLapPolicy::Drop);
/// println!("{}% of laps valid", report.summary.success_rate_percent);
/// ```
#[derive(Debug)]
pub struct ComplianceEngine {
    rules: MissionRules,
    home: HomeLocator,
    segmenter: LapSegmenter,
    laps: LapAggregator,
    samples: Vec<PositionSample>,
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new(MissionRules::default())
    }
}

impl ComplianceEngine {
    /// Create an engine for the given rules.
    pub fn new(rules: MissionRules) -> Self {
        Self {
            segmenter: LapSegmenter::new(&rules),
            rules,
            home: HomeLocator::new(),
            laps: LapAggregator::new(),
            samples: Vec::new(),
        }
    }

    /// Feed one sample. Ground samples are ignored.
    pub fn ingest(&mut self, sample: PositionSample) {
        if sample.alt <= self.rules.min_airborne_alt_m {
            return;
        }

        self.samples.push(sample);
        let home = self.home.locate(&sample);

        if let Transition::Closed(record) = self.segmenter.update(&sample, &home) {
            self.laps.push(record);
        }
    }

    /// Feed every sample of an iterator, in order.
    pub fn ingest_all<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = PositionSample>,
    {
        for sample in samples {
            self.ingest(sample);
        }
    }

    /// Laps closed so far.
    pub fn laps(&self) -> &[LapRecord] {
        self.laps.records()
    }

    /// Summary over laps closed so far.
    pub fn summary(&self) -> FlightSummary {
        self.laps.summary()
    }

    /// Locked home, if any.
    pub fn home(&self) -> Option<HomePosition> {
        self.home.home()
    }

    /// Airborne samples seen so far.
    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }

    /// Rules in effect.
    pub fn rules(&self) -> &MissionRules {
        &self.rules
    }

    /// Whether a lap is currently open.
    pub fn is_in_lap(&self) -> bool {
        self.segmenter.open_lap().is_some()
    }

    /// Number of laps opened so far, including an open one.
    pub fn laps_opened(&self) -> u32 {
        self.segmenter.laps_opened()
    }

    /// Id of the open lap, if any.
    pub fn current_lap_id(&self) -> Option<u32> {
        self.segmenter.open_lap().map(|lap| lap.lap_id())
    }

    /// End the stream and produce the report.
    pub fn finalize(mut self, policy: UnclosedLapPolicy) -> FlightReport {
        let last_ts = self.samples.last().map_or(0, |s| s.timestamp_ms);

        if let Some(record) = self
            .segmenter
            .take_open_lap(last_ts, LapCompletion::Incomplete)
        {
            match policy {
                UnclosedLapPolicy::Drop => {
                    warn!(
                        lap_id = record.lap_id,
                        "Log ended during a lap; dropping unfinished lap"
                    );
                }
                UnclosedLapPolicy::Incomplete => {
                    warn!(
                        lap_id = record.lap_id,
                        valid = record.is_valid,
                        "Log ended during a lap; recording it as incomplete"
                    );
                    self.laps.push(record);
                }
            }
        }

        let summary = self.laps.summary();
        info!(
            samples = self.samples.len(),
            total_laps = summary.total_laps,
            valid_laps = summary.valid_laps,
            success_rate = summary.success_rate_percent,
            "Flight analysis complete"
        );

        FlightReport {
            home: self.home.home(),
            laps: self.laps.into_records(),
            summary,
            samples: self.samples,
            rules: self.rules,
        }
    }
}

/// Analyze a whole flight in one call.
pub fn analyze<I>(samples: I, rules: MissionRules, policy: UnclosedLapPolicy) -> FlightReport
where
    I: IntoIterator<Item = PositionSample>,
{
    let mut engine = ComplianceEngine::new(rules);
    engine.ingest_all(samples);
    engine.finalize(policy)
}
