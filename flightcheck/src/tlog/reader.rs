//! `.tlog` decoding.
//!
//! A telemetry log is a sequence of records, each an 8-byte big-endian
//! microsecond wall-clock timestamp followed by one MAVLink frame. Ground
//! stations record v1 (`0xFE`) and v2 (`0xFD`) frames, sometimes in the same
//! file, so the frame version is picked per frame from its start byte.
//!
//! A candidate frame is sized from its header and decoded on its own before
//! any bytes are consumed. Bytes that do not start a frame with a valid CRC
//! (timestamp prefixes, corruption) are skipped one at a time, so a false
//! start marker never swallows the frame that follows it.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use mavlink::common::{MavMessage, GLOBAL_POSITION_INT_DATA};
use mavlink::error::MessageReadError;
use mavlink::peek_reader::PeekReader;
use mavlink::MavlinkVersion;
use tracing::{debug, warn};

use super::error::TlogError;
use crate::compliance::PositionSample;

/// Scale of MAVLink integer latitude/longitude (degrees * 1e7).
pub const DEGREES_SCALE: f64 = 1e7;

/// Scale of MAVLink integer altitude (millimeters).
pub const MILLIMETERS_PER_METER: f64 = 1000.0;

const STX_V1: u8 = 0xFE;
const STX_V2: u8 = 0xFD;

/// v1 framing around the payload: 6 header bytes and a 2-byte CRC.
const V1_OVERHEAD: usize = 8;

/// v2 framing around the payload: 10 header bytes and a 2-byte CRC.
const V2_OVERHEAD: usize = 12;

/// v2 signature appended when the signed incompatibility flag is set.
const V2_SIGNATURE_LEN: usize = 13;

const V2_FLAG_SIGNED: u8 = 0x01;

/// Largest possible frame (signed v2 with a 255-byte payload).
const MAX_FRAME_LEN: usize = V2_OVERHEAD + 255 + V2_SIGNATURE_LEN;

/// Decoder statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TlogStats {
    /// MAVLink messages decoded (any type).
    pub messages: u64,
    /// `GLOBAL_POSITION_INT` messages turned into samples.
    pub positions: u64,
    /// Frames that passed CRC but failed to parse.
    pub parse_errors: u64,
    /// Bytes outside decoded frames (timestamp prefixes, noise).
    pub skipped_bytes: u64,
}

/// Convert a `GLOBAL_POSITION_INT` payload into a sample.
pub fn sample_from_global_position(pos: &GLOBAL_POSITION_INT_DATA) -> PositionSample {
    PositionSample::new(
        u64::from(pos.time_boot_ms),
        f64::from(pos.lat) / DEGREES_SCALE,
        f64::from(pos.lon) / DEGREES_SCALE,
        f64::from(pos.relative_alt) / MILLIMETERS_PER_METER,
    )
}

/// Iterator over the position samples of a `.tlog` stream.
///
/// Yields samples in file order. Stops at end of stream; a non-EOF I/O
/// error is yielded once and ends iteration.
pub struct TlogReader<R: Read> {
    reader: PeekReader<R>,
    stats: TlogStats,
    finished: bool,
}

impl TlogReader<BufReader<File>> {
    /// Open a `.tlog` file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TlogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TlogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> TlogReader<R> {
    /// Wrap a byte stream.
    pub fn new(inner: R) -> Self {
        Self {
            reader: PeekReader::new(inner),
            stats: TlogStats::default(),
            finished: false,
        }
    }

    /// Decoder statistics so far.
    pub fn stats(&self) -> TlogStats {
        self.stats
    }

    /// Peek `amount` bytes; `None` if the stream ends first.
    fn peek(&mut self, amount: usize) -> Result<Option<&[u8]>, TlogError> {
        match self.reader.peek_exact(amount).map_err(MessageReadError::from) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(MessageReadError::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
            Err(MessageReadError::Io(e)) => Err(TlogError::Io(e)),
            Err(e) => Err(TlogError::Io(std::io::Error::new(
                ErrorKind::InvalidData,
                e.to_string(),
            ))),
        }
    }

    fn skip(&mut self, amount: usize) {
        self.reader.consume(amount);
        self.stats.skipped_bytes += amount as u64;
    }

    /// Decode the next frame of either version; `None` at end of stream.
    fn next_message(&mut self) -> Result<Option<MavMessage>, TlogError> {
        let mut frame = [0u8; MAX_FRAME_LEN];

        loop {
            // Start marker and payload length
            let (stx, payload_len) = match self.peek(2)? {
                Some(head) => (head[0], usize::from(head[1])),
                None => return Ok(None),
            };

            let (version, frame_len) = match stx {
                STX_V1 => (MavlinkVersion::V1, V1_OVERHEAD + payload_len),
                STX_V2 => {
                    let flags = match self.peek(3)? {
                        Some(head) => head[2],
                        None => return Ok(None),
                    };
                    let signature = if flags & V2_FLAG_SIGNED != 0 {
                        V2_SIGNATURE_LEN
                    } else {
                        0
                    };
                    (MavlinkVersion::V2, V2_OVERHEAD + payload_len + signature)
                }
                _ => {
                    self.skip(1);
                    continue;
                }
            };

            // A false marker near the end of the stream cannot be a frame
            let complete = match self.peek(frame_len)? {
                Some(bytes) => {
                    frame[..frame_len].copy_from_slice(bytes);
                    true
                }
                None => false,
            };
            if !complete {
                self.skip(1);
                continue;
            }

            let mut candidate = PeekReader::new(&frame[..frame_len]);
            let decoded = mavlink::read_versioned_msg::<MavMessage, _>(&mut candidate, version);
            // A frame found past offset 0 belongs to a later start marker
            let exhausted = candidate.peek_exact(1).is_err();
            match decoded {
                Ok((_header, message)) if exhausted => {
                    self.reader.consume(frame_len);
                    self.stats.messages += 1;
                    return Ok(Some(message));
                }
                Err(MessageReadError::Parse(e)) if exhausted => {
                    self.reader.consume(frame_len);
                    self.stats.parse_errors += 1;
                    warn!(error = %e, ?version, "Skipping undecodable MAVLink frame");
                }
                // Bad CRC or unsupported flags: not a frame start
                _ => self.skip(1),
            }
        }
    }

    fn end_of_stream(&mut self) {
        self.finished = true;
        debug!(
            messages = self.stats.messages,
            positions = self.stats.positions,
            skipped_bytes = self.stats.skipped_bytes,
            "End of telemetry log"
        );
        if self.stats.positions == 0 && (self.stats.messages > 0 || self.stats.skipped_bytes > 0) {
            warn!(
                messages = self.stats.messages,
                skipped_bytes = self.stats.skipped_bytes,
                "Telemetry log contains no GLOBAL_POSITION_INT messages"
            );
        }
    }
}

impl<R: Read> Iterator for TlogReader<R> {
    type Item = Result<PositionSample, TlogError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.next_message() {
                Ok(Some(MavMessage::GLOBAL_POSITION_INT(pos))) => {
                    self.stats.positions += 1;
                    return Some(Ok(sample_from_global_position(&pos)));
                }
                Ok(Some(_)) => {}
                Ok(None) => {
                    self.end_of_stream();
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Read every position sample of a `.tlog` file.
pub fn read_tlog(path: impl AsRef<Path>) -> Result<(Vec<PositionSample>, TlogStats), TlogError> {
    let mut reader = TlogReader::open(path)?;
    let samples = reader.by_ref().collect::<Result<Vec<_>, _>>()?;
    Ok((samples, reader.stats()))
}
