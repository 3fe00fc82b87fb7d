//! Lap state and lap records.
//!
//! A [`LapState`] lives only while a lap is open. When the lap closes it is
//! consumed into an immutable [`LapRecord`].

use serde::{Serialize, Serializer};

/// Why a lap failed, or `Clean` if it has not.
///
/// Only the first cause observed in a lap is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailReason {
    /// No rule has been broken.
    #[default]
    Clean,
    /// The altitude ceiling was exceeded. Altitude is truncated to whole meters.
    Altitude { alt_m: i64 },
    /// The aircraft entered the no-fly zone.
    NoFlyZone,
}

impl FailReason {
    /// Whether this is the `Clean` reason.
    pub fn is_clean(&self) -> bool {
        matches!(self, FailReason::Clean)
    }

    /// Short machine-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailReason::Clean => "clean",
            FailReason::Altitude { .. } => "altitude",
            FailReason::NoFlyZone => "no_fly_zone",
        }
    }
}

impl std::fmt::Display for FailReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailReason::Clean => write!(f, "Clean"),
            FailReason::Altitude { alt_m } => write!(f, "ALTITUDE VIOLATION ({}m)", alt_m),
            FailReason::NoFlyZone => write!(f, "NFZ VIOLATION (Inside Zone)"),
        }
    }
}

impl Serialize for FailReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How a lap ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LapCompletion {
    /// The aircraft returned inside the home radius.
    Closed,
    /// The log ended while the lap was still open.
    Incomplete,
}

/// Live state of the currently open lap.
#[derive(Debug, Clone, PartialEq)]
pub struct LapState {
    lap_id: u32,
    max_alt_seen: f64,
    fail_reason: FailReason,
    started_at_ms: u64,
    sample_count: usize,
}

impl LapState {
    /// Open a fresh, valid lap.
    pub(crate) fn open(lap_id: u32, started_at_ms: u64) -> Self {
        Self {
            lap_id,
            max_alt_seen: 0.0,
            fail_reason: FailReason::Clean,
            started_at_ms,
            sample_count: 0,
        }
    }

    /// Lap number (1-based).
    pub fn lap_id(&self) -> u32 {
        self.lap_id
    }

    /// Whether no rule has been broken so far.
    pub fn is_valid(&self) -> bool {
        self.fail_reason.is_clean()
    }

    /// Highest altitude seen in this lap.
    pub fn max_alt_seen(&self) -> f64 {
        self.max_alt_seen
    }

    /// First recorded failure cause.
    pub fn fail_reason(&self) -> FailReason {
        self.fail_reason
    }

    /// Track a sample's altitude.
    pub(crate) fn observe(&mut self, alt: f64) {
        self.sample_count += 1;
        if alt > self.max_alt_seen {
            self.max_alt_seen = alt;
        }
    }

    /// Record a violation. Only the first one sticks.
    ///
    /// Returns `true` if this call invalidated the lap.
    pub(crate) fn record_violation(&mut self, reason: FailReason) -> bool {
        if reason.is_clean() || !self.fail_reason.is_clean() {
            return false;
        }
        self.fail_reason = reason;
        true
    }

    /// Consume into an immutable record.
    pub(crate) fn into_record(self, ended_at_ms: u64, completion: LapCompletion) -> LapRecord {
        LapRecord {
            lap_id: self.lap_id,
            is_valid: self.fail_reason.is_clean(),
            max_alt: self.max_alt_seen,
            fail_reason: self.fail_reason,
            started_at_ms: self.started_at_ms,
            ended_at_ms,
            sample_count: self.sample_count,
            completion,
        }
    }
}

/// Summary of one finished lap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapRecord {
    /// Lap number (1-based, strictly increasing).
    pub lap_id: u32,
    /// Whether the lap broke no rules. See [`LapRecord::counts_as_valid`].
    pub is_valid: bool,
    /// Highest altitude reached during the lap (meters).
    pub max_alt: f64,
    /// First failure cause, `Clean` if valid.
    pub fail_reason: FailReason,
    /// Timestamp of the sample that opened the lap.
    pub started_at_ms: u64,
    /// Timestamp of the sample that closed the lap (or the last one seen).
    pub ended_at_ms: u64,
    /// Number of samples evaluated while the lap was open.
    pub sample_count: usize,
    /// Whether the lap returned home before the log ended.
    pub completion: LapCompletion,
}

impl LapRecord {
    /// Whether the lap returned home.
    pub fn is_complete(&self) -> bool {
        self.completion == LapCompletion::Closed
    }

    /// Whether the lap counts as valid in the flight summary.
    ///
    /// A lap that never returned home is not valid even if it broke no rule.
    pub fn counts_as_valid(&self) -> bool {
        self.is_valid && self.is_complete()
    }

    /// Lap duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.ended_at_ms.saturating_sub(self.started_at_ms)
    }
}
