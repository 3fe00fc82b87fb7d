//! Ordered lap output and flight summary.

use serde::Serialize;

use super::lap::LapRecord;

/// Totals over all laps of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FlightSummary {
    /// Number of lap records.
    pub total_laps: usize,
    /// Completed laps that broke no rule.
    pub valid_laps: usize,
    /// `valid_laps * 100 / total_laps`, integer division; 0 with no laps.
    pub success_rate_percent: usize,
}

impl FlightSummary {
    /// Compute a summary over lap records.
    ///
    /// Incomplete laps count toward the total but never as valid.
    pub fn from_laps(laps: &[LapRecord]) -> Self {
        let total_laps = laps.len();
        let valid_laps = laps
            .iter()
            .filter(|lap| lap.counts_as_valid())
            .count();
        let success_rate_percent = if total_laps == 0 {
            0
        } else {
            valid_laps * 100 / total_laps
        };

        Self {
            total_laps,
            valid_laps,
            success_rate_percent,
        }
    }

    /// Number of laps that failed or did not complete.
    pub fn failed_laps(&self) -> usize {
        self.total_laps - self.valid_laps
    }
}

/// Append-only sequence of lap records in close order.
#[derive(Debug, Default)]
pub struct LapAggregator {
    records: Vec<LapRecord>,
}

impl LapAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished lap.
    pub fn push(&mut self, record: LapRecord) {
        debug_assert!(
            self.records
                .last()
                .map_or(true, |last| last.lap_id < record.lap_id),
            "lap records must arrive in increasing lap_id order"
        );
        self.records.push(record);
    }

    /// Records so far, oldest first.
    pub fn records(&self) -> &[LapRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no lap has finished yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Summary over the records so far.
    pub fn summary(&self) -> FlightSummary {
        FlightSummary::from_laps(&self.records)
    }

    /// Take ownership of the records.
    pub fn into_records(self) -> Vec<LapRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::lap::{FailReason, LapCompletion};

    fn record(lap_id: u32, is_valid: bool) -> LapRecord {
        LapRecord {
            lap_id,
            is_valid,
            max_alt: 40.0,
            fail_reason: if is_valid {
                FailReason::Clean
            } else {
                FailReason::NoFlyZone
            },
            started_at_ms: 0,
            ended_at_ms: 0,
            sample_count: 1,
            completion: LapCompletion::Closed,
        }
    }

    #[test]
    fn test_empty_summary() {
        let agg = LapAggregator::new();
        assert!(agg.is_empty());
        assert_eq!(
            agg.summary(),
            FlightSummary {
                total_laps: 0,
                valid_laps: 0,
                success_rate_percent: 0
            }
        );
    }

    #[test]
    fn test_three_of_four_is_75_percent() {
        let mut agg = LapAggregator::new();
        agg.push(record(1, true));
        agg.push(record(2, false));
        agg.push(record(3, true));
        agg.push(record(4, true));

        let summary = agg.summary();
        assert_eq!(summary.total_laps, 4);
        assert_eq!(summary.valid_laps, 3);
        assert_eq!(summary.success_rate_percent, 75);
        assert_eq!(summary.failed_laps(), 1);
    }

    #[test]
    fn test_success_rate_truncates() {
        let laps = vec![record(1, true), record(2, false), record(3, false)];
        assert_eq!(FlightSummary::from_laps(&laps).success_rate_percent, 33);
    }

    #[test]
    fn test_incomplete_lap_is_never_valid() {
        let mut incomplete = record(2, true);
        incomplete.completion = LapCompletion::Incomplete;
        let laps = vec![record(1, true), incomplete];

        let summary = FlightSummary::from_laps(&laps);
        assert_eq!(summary.total_laps, 2);
        assert_eq!(summary.valid_laps, 1);
        assert_eq!(summary.success_rate_percent, 50);
    }

    #[test]
    fn test_records_keep_order() {
        let mut agg = LapAggregator::new();
        agg.push(record(1, true));
        agg.push(record(2, true));

        let ids: Vec<u32> = agg.into_records().iter().map(|r| r.lap_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
