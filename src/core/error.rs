// Error handling for the DACQ codec

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DacqError>;

#[derive(Error, Debug)]
pub enum DacqError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed header at line {line}: {reason}")]
    MalformedHeader { line: usize, reason: String },

    #[error("Missing header key: {0}")]
    MissingHeaderKey(&'static str),

    #[error("Invalid value for header key {key}: {value:?}")]
    InvalidHeaderValue { key: &'static str, value: String },

    #[error("Missing sentinel {sentinel:?}: {reason}")]
    MissingSentinel { sentinel: &'static str, reason: String },

    #[error(
        "Truncated payload: {len} bytes is not a multiple of the {record_width}-byte record \
         ({remainder} left over)"
    )]
    TruncatedPayload {
        len: usize,
        record_width: usize,
        remainder: usize,
    },

    #[error("Unsupported sample width: bytes_per_sample = {0}")]
    UnsupportedSampleWidth(String),

    #[error("Unknown event type 0x{byte:02x} at payload offset {offset}")]
    UnknownEventType { byte: u8, offset: usize },

    #[error("Refusing to overwrite existing file {path:?}")]
    OverwriteRefused { path: PathBuf },

    #[error("Unrecognized DACQ file type: {path:?}")]
    UnrecognizedFormat { path: PathBuf },

    #[error("Inconsistent records: {0}")]
    InconsistentRecords(String),

    #[error("{what} out of range: {value}")]
    ValueOutOfRange { what: &'static str, value: f64 },

    #[error("Config error: {0}")]
    Config(String),
}

impl DacqError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DacqError::Io {
            path: path.into(),
            source,
        }
    }
}
