//! Telemetry log error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading or writing `.tlog` files.
#[derive(Debug, Error)]
pub enum TlogError {
    /// I/O error on the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The log file could not be opened or created.
    #[error("Cannot open telemetry log {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A MAVLink frame could not be encoded.
    #[error("Failed to encode MAVLink frame: {0}")]
    Encode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_display() {
        let err = TlogError::Open {
            path: PathBuf::from("/missing/mission.tlog"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/missing/mission.tlog"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_io_error_from() {
        let err: TlogError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, TlogError::Io(_)));
    }
}
