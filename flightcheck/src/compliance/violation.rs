//! Per-sample rule evaluation for an open lap.
//!
//! Rules are evaluated in a fixed order:
//!
//! 1. Altitude ceiling: `alt > ceiling`
//! 2. No-fly zone: `distance(sample, center) < radius`
//!
//! The order is the tie-break when one sample breaks both rules.

use tracing::{debug, info};

use super::lap::{FailReason, LapState};
use super::types::PositionSample;
use crate::rules::{Geofence, MissionRules};

/// Evaluates mission rules against samples of the open lap.
#[derive(Debug, Clone, Copy)]
pub struct ViolationDetector {
    altitude_ceiling_m: f64,
    geofence: Geofence,
}

impl ViolationDetector {
    /// Create a detector from mission rules.
    pub fn new(rules: &MissionRules) -> Self {
        Self {
            altitude_ceiling_m: rules.altitude_ceiling_m,
            geofence: rules.geofence,
        }
    }

    /// Every rule the sample breaks, in evaluation order.
    pub fn violations(&self, sample: &PositionSample) -> impl Iterator<Item = FailReason> {
        let altitude = (sample.alt > self.altitude_ceiling_m).then(|| FailReason::Altitude {
            alt_m: sample.alt.trunc() as i64,
        });
        let geofence = self
            .geofence
            .contains(sample.point())
            .then_some(FailReason::NoFlyZone);
        altitude.into_iter().chain(geofence)
    }

    /// Evaluate a sample against the open lap.
    ///
    /// Invalidates the lap on its first violation; later ones are only logged.
    pub fn evaluate(&self, lap: &mut LapState, sample: &PositionSample) {
        for reason in self.violations(sample) {
            if lap.record_violation(reason) {
                info!(
                    lap_id = lap.lap_id(),
                    reason = %reason,
                    timestamp_ms = sample.timestamp_ms,
                    "Lap invalidated"
                );
            } else {
                debug!(
                    lap_id = lap.lap_id(),
                    reason = %reason,
                    first_reason = %lap.fail_reason(),
                    "Additional violation in already failed lap"
                );
            }
        }
    }
}
