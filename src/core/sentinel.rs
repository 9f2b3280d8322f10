// Locating the binary payload between the data_start / data_end markers

use crate::core::constants::{DATA_END, DATA_START};
use crate::core::error::{DacqError, Result};

/// Byte offsets of the header and payload inside a raw file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadBounds {
    /// Where the start sentinel begins; the header is `bytes[..header_end]`.
    pub header_end: usize,
    pub payload_start: usize,
    pub payload_end: usize,
}

impl PayloadBounds {
    pub fn header<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        &bytes[..self.header_end]
    }

    pub fn payload<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        &bytes[self.payload_start..self.payload_end]
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn sentinel_name(token: &[u8]) -> &'static str {
    if token == DATA_START {
        "\\r\\ndata_start"
    } else {
        "\\r\\ndata_end"
    }
}

pub fn locate(bytes: &[u8]) -> Result<PayloadBounds> {
    let header_end = find(bytes, DATA_START).ok_or_else(|| DacqError::MissingSentinel {
        sentinel: sentinel_name(DATA_START),
        reason: "start marker not found".to_string(),
    })?;
    let payload_start = header_end + DATA_START.len();

    match find(&bytes[payload_start..], DATA_END) {
        Some(rel) => Ok(PayloadBounds {
            header_end,
            payload_start,
            payload_end: payload_start + rel,
        }),
        None => {
            let reason = match find(bytes, DATA_END) {
                Some(pos) => format!(
                    "end marker at offset {} precedes start marker at offset {}",
                    pos, header_end
                ),
                None => "end marker not found".to_string(),
            };
            Err(DacqError::MissingSentinel {
                sentinel: sentinel_name(DATA_END),
                reason,
            })
        }
    }
}

/// Joins header text and payload with the two markers, no padding.
pub fn emit(header_text: &str, payload: &[u8]) -> Vec<u8> {
    let mut out =
        Vec::with_capacity(header_text.len() + DATA_START.len() + payload.len() + DATA_END.len());
    out.extend_from_slice(header_text.as_bytes());
    out.extend_from_slice(DATA_START);
    out.extend_from_slice(payload);
    out.extend_from_slice(DATA_END);
    out
}
