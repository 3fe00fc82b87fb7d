//! `.tlog` encoding for synthetic flights.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mavlink::common::{MavMessage, GLOBAL_POSITION_INT_DATA};
use mavlink::{MavHeader, MavlinkVersion};

use super::error::TlogError;
use super::reader::{DEGREES_SCALE, MILLIMETERS_PER_METER};
use crate::compliance::PositionSample;

/// Wall-clock origin for record timestamps (2024-01-01T00:00:00Z, microseconds).
///
/// Fixed so that identical flights produce identical files.
pub const DEFAULT_BASE_TIME_US: u64 = 1_704_067_200_000_000;

/// Heading value meaning "unknown" in `GLOBAL_POSITION_INT`.
const HEADING_UNKNOWN: u16 = u16::MAX;

/// Writes position samples as `GLOBAL_POSITION_INT` records.
pub struct TlogWriter<W: Write> {
    writer: W,
    header: MavHeader,
    version: MavlinkVersion,
    base_time_us: u64,
    records: usize,
}

impl TlogWriter<BufWriter<File>> {
    /// Create (or truncate) a `.tlog` file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, TlogError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| TlogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> TlogWriter<W> {
    /// Wrap a byte sink.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header: MavHeader {
                system_id: 1,
                component_id: 1,
                sequence: 0,
            },
            version: MavlinkVersion::V2,
            base_time_us: DEFAULT_BASE_TIME_US,
            records: 0,
        }
    }

    /// Set the wall-clock origin of record timestamps.
    pub fn with_base_time_us(mut self, base_time_us: u64) -> Self {
        self.base_time_us = base_time_us;
        self
    }

    /// Set the MAVLink framing version (v2 by default).
    pub fn with_version(mut self, version: MavlinkVersion) -> Self {
        self.version = version;
        self
    }

    /// Number of records written.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Append one sample.
    pub fn write_sample(&mut self, sample: &PositionSample) -> Result<(), TlogError> {
        let alt_mm = (sample.alt * MILLIMETERS_PER_METER).round() as i32;
        let message = MavMessage::GLOBAL_POSITION_INT(GLOBAL_POSITION_INT_DATA {
            time_boot_ms: sample.timestamp_ms as u32,
            lat: (sample.lat * DEGREES_SCALE).round() as i32,
            lon: (sample.lon * DEGREES_SCALE).round() as i32,
            alt: alt_mm,
            relative_alt: alt_mm,
            vx: 0,
            vy: 0,
            vz: 0,
            hdg: HEADING_UNKNOWN,
        });

        let timestamp_us = self.base_time_us + sample.timestamp_ms * 1000;
        self.writer.write_all(&timestamp_us.to_be_bytes())?;
        mavlink::write_versioned_msg(&mut self.writer, self.version, self.header, &message)
            .map_err(|e| TlogError::Encode(e.to_string()))?;

        self.header.sequence = self.header.sequence.wrapping_add(1);
        self.records += 1;
        Ok(())
    }

    /// Append every sample.
    pub fn write_all<'a, I>(&mut self, samples: I) -> Result<(), TlogError>
    where
        I: IntoIterator<Item = &'a PositionSample>,
    {
        for sample in samples {
            self.write_sample(sample)?;
        }
        Ok(())
    }

    /// Flush and return the inner writer.
    pub fn finish(mut self) -> Result<W, TlogError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Write samples to a `.tlog` file, returning the record count.
pub fn write_tlog(path: impl AsRef<Path>, samples: &[PositionSample]) -> Result<usize, TlogError> {
    let mut writer = TlogWriter::create(path)?;
    writer.write_all(samples)?;
    let records = writer.records();
    writer.finish()?;
    Ok(records)
}
