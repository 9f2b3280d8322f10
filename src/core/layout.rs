// Helpers shared by the per-format codecs

use crate::core::error::{DacqError, Result};
use crate::core::header::Header;
use crate::core::sentinel;

/// Splits raw file bytes into the parsed header and the payload slice.
pub(crate) fn split(bytes: &[u8]) -> Result<(Header, &[u8])> {
    let bounds = sentinel::locate(bytes)?;
    let header = Header::parse_bytes(bounds.header(bytes))?;
    Ok((header, bounds.payload(bytes)))
}

/// Fails with `TruncatedPayload` unless `payload` holds whole records.
pub(crate) fn record_count(payload: &[u8], record_width: usize) -> Result<usize> {
    let remainder = payload.len() % record_width;
    if remainder != 0 {
        return Err(DacqError::TruncatedPayload {
            len: payload.len(),
            record_width,
            remainder,
        });
    }
    Ok(payload.len() / record_width)
}

pub(crate) fn ticks_to_seconds(ticks: i32, timebase: f64) -> f64 {
    ticks as f64 / timebase
}

pub(crate) fn seconds_to_ticks(seconds: f64, timebase: f64) -> Result<i32> {
    let ticks = (seconds * timebase).round();
    if !ticks.is_finite() || ticks < i32::MIN as f64 || ticks > i32::MAX as f64 {
        return Err(DacqError::ValueOutOfRange {
            what: "timestamp",
            value: seconds,
        });
    }
    Ok(ticks as i32)
}
