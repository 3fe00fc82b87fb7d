//! MAVLink telemetry log (`.tlog`) input and output.
//!
//! This is the boundary between raw recorded bytes and the compliance
//! engine. Framing, checksums and message decoding are delegated to the
//! `mavlink` crate; this module only picks out `GLOBAL_POSITION_INT`
//! messages and applies the field scaling.
//!
//! # Record Layout
//!
//! ```text
//! ┌──────────────────────┬───────────────────────────────────────────┐
//! │ timestamp (u64 BE µs)│ MAVLink v1 (0xFE ...) or v2 (0xFD ...)    │
//! └──────────────────────┴───────────────────────────────────────────┘
//! ```
//!
//! | Field          | Wire            | Sample            |
//! |----------------|-----------------|-------------------|
//! | `time_boot_ms` | u32 ms          | `timestamp_ms`    |
//! | `lat`, `lon`   | i32 deg * 1e7   | degrees           |
//! | `relative_alt` | i32 mm          | meters            |

mod error;
mod reader;
mod writer;

pub use error::TlogError;
pub use mavlink::MavlinkVersion;
pub use reader::{read_tlog, sample_from_global_position, TlogReader, TlogStats};
pub use writer::{write_tlog, TlogWriter, DEFAULT_BASE_TIME_US};
