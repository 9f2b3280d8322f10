use crate::core::endian::ByteOrder;
use crate::core::error::{DacqError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Codec settings. Every field has a default, so `{}` is a valid options file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Byte order the normalizer treats as the host's.
    pub host_order: ByteOrder,
    /// Replace existing files on write.
    pub overwrite: bool,
    /// Reject tetrode headers whose `num_spikes` disagrees with the data.
    pub strict_spike_count: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            host_order: ByteOrder::native(),
            overwrite: true,
            strict_spike_count: false,
        }
    }
}

impl CodecOptions {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let data = fs::read_to_string(path).map_err(|e| DacqError::io(path, e))?;

        let options: CodecOptions = serde_json::from_str(&data).map_err(|e| {
            DacqError::Config(format!("JSON parse error in {}: {e}", path.display()))
        })?;

        info!("Codec options loaded from {}", path.display());
        Ok(options)
    }
}
