// Tetrode spike files: 216-byte records of 4 x (timestamp + 50-sample waveform)

use crate::core::constants::*;
use crate::core::endian::EndianNormalizer;
use crate::core::error::{DacqError, Result};
use crate::core::format::{SpikeTimestamps, SpikeWaveforms, TetrodeData};
use crate::core::header::Header;
use crate::core::layout::{record_count, seconds_to_ticks, split, ticks_to_seconds};
use crate::core::sentinel;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct TetrodeCodec {
    endian: EndianNormalizer,
    strict_spike_count: bool,
}

impl TetrodeCodec {
    pub fn new(endian: EndianNormalizer) -> Self {
        Self {
            endian,
            strict_spike_count: false,
        }
    }

    /// Reject headers whose `num_spikes` disagrees with the data on encode.
    pub fn strict_spike_count(mut self, strict: bool) -> Self {
        self.strict_spike_count = strict;
        self
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<TetrodeData> {
        let (header, payload) = split(bytes)?;
        let available = record_count(payload, SPIKE_RECORD_SIZE)?;
        let timebase = header.timebase()?;

        let count = match header.num_spikes() {
            Some(n) if n < available => {
                warn!(
                    "ignoring {} padding records beyond num_spikes = {}",
                    available - n,
                    n
                );
                n
            }
            Some(n) if n > available => {
                warn!("num_spikes = {} but payload only holds {} spikes", n, available);
                available
            }
            Some(n) => n,
            None => available,
        };

        let mut timestamps = Vec::with_capacity(count);
        let mut waveforms = Vec::with_capacity(count);

        for record in payload.chunks_exact(SPIKE_RECORD_SIZE).take(count) {
            // the three copies after the first are not consulted
            let ticks = self.endian.read_i32(record, 0);
            timestamps.push(ticks_to_seconds(ticks, timebase));

            let mut spike: SpikeWaveforms = [[0; SAMPLES_PER_SPIKE]; TETRODE_CHANNELS];
            for (ch, wave) in spike.iter_mut().enumerate() {
                let start = ch * CHANNEL_BLOCK_SIZE + TIMESTAMP_SIZE;
                let samples = &record[start..start + SAMPLES_PER_SPIKE];
                for (dst, &src) in wave.iter_mut().zip(samples) {
                    *dst = self.endian.to_host_i8(src);
                }
            }
            waveforms.push(spike);
        }

        debug!("decoded {} spikes at timebase {} Hz", count, timebase);

        Ok(TetrodeData {
            header,
            timestamps,
            waveforms,
        })
    }

    /// Lays out spikes with the timestamp duplicated before every channel.
    ///
    /// `num_spikes` in `header` is written as given.
    pub fn encode(
        &self,
        header: &Header,
        timestamps: SpikeTimestamps<'_>,
        waveforms: &[SpikeWaveforms],
    ) -> Result<Vec<u8>> {
        header.validate()?;
        if timestamps.len() != waveforms.len() {
            return Err(DacqError::InconsistentRecords(format!(
                "{} timestamps for {} waveforms",
                timestamps.len(),
                waveforms.len()
            )));
        }

        match header.num_spikes() {
            Some(n) if n != waveforms.len() => {
                if self.strict_spike_count {
                    return Err(DacqError::InconsistentRecords(format!(
                        "header num_spikes = {} but {} spikes supplied",
                        n,
                        waveforms.len()
                    )));
                }
                warn!("header num_spikes = {} but {} spikes supplied", n, waveforms.len());
            }
            None if self.strict_spike_count => {
                return Err(DacqError::MissingHeaderKey(KEY_NUM_SPIKES));
            }
            _ => {}
        }

        let timebase = header.timebase()?;
        let mut payload = Vec::with_capacity(waveforms.len() * SPIKE_RECORD_SIZE);

        for (idx, spike) in waveforms.iter().enumerate() {
            let seconds = timestamps.get(idx).unwrap_or_default();
            let ts = self.endian.to_file_i32(seconds_to_ticks(seconds, timebase)?);

            for wave in spike {
                payload.extend_from_slice(&ts);
                payload.extend(wave.iter().map(|&s| self.endian.to_file_i8(s)));
            }
        }

        debug!("encoded {} spikes ({} payload bytes)", waveforms.len(), payload.len());
        Ok(sentinel::emit(&header.serialize(), &payload))
    }
}
