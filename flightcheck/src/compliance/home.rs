//! Home reference locking.
//!
//! The first airborne sample of a flight becomes home. Once locked it is
//! never recomputed, even if the aircraft lands somewhere else.

use tracing::info;

use super::types::{HomePosition, PositionSample};

/// Locks the home position from the first sample it sees.
#[derive(Debug, Default)]
pub struct HomeLocator {
    home: Option<HomePosition>,
}

impl HomeLocator {
    /// Create a locator with no home set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the locked home, locking it from `sample` if not yet set.
    pub fn locate(&mut self, sample: &PositionSample) -> HomePosition {
        *self.home.get_or_insert_with(|| {
            let home = HomePosition::from(sample);
            info!(
                lat = home.lat,
                lon = home.lon,
                timestamp_ms = sample.timestamp_ms,
                "Home point locked"
            );
            home
        })
    }

    /// The locked home, if any sample has been seen.
    pub fn home(&self) -> Option<HomePosition> {
        self.home
    }

    /// Whether home has been locked.
    pub fn is_locked(&self) -> bool {
        self.home.is_some()
    }
}
