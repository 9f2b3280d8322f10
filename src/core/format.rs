// Decoded record types for DACQ formats

use crate::core::constants::*;
use crate::core::header::Header;
use serde::Serialize;
use std::path::Path;

/// One tetrode channel's waveform.
pub type Waveform = [i8; SAMPLES_PER_SPIKE];

/// The four channel waveforms of a single spike.
pub type SpikeWaveforms = [Waveform; TETRODE_CHANNELS];

#[derive(Debug, Clone, PartialEq)]
pub struct SpikeRecord {
    /// Seconds since the start of the trial.
    pub timestamp: f64,
    pub waveforms: SpikeWaveforms,
}

#[derive(Debug, Clone)]
pub struct TetrodeData {
    pub header: Header,
    pub timestamps: Vec<f64>,
    pub waveforms: Vec<SpikeWaveforms>,
}

impl TetrodeData {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = SpikeRecord> + '_ {
        self.timestamps
            .iter()
            .zip(&self.waveforms)
            .map(|(&timestamp, waveforms)| SpikeRecord {
                timestamp,
                waveforms: *waveforms,
            })
    }

    /// The on-disk duplicated layout: the same timestamp once per channel.
    pub fn timestamp_columns(&self) -> Vec<[f64; TETRODE_CHANNELS]> {
        self.timestamps.iter().map(|&t| [t; TETRODE_CHANNELS]).collect()
    }
}

/// Spike timestamps as supplied to the tetrode encoder.
#[derive(Debug, Clone, Copy)]
pub enum SpikeTimestamps<'a> {
    /// One canonical timestamp per spike.
    Single(&'a [f64]),
    /// One column per channel; only the first column is written.
    PerChannel(&'a [[f64; TETRODE_CHANNELS]]),
}

impl SpikeTimestamps<'_> {
    pub fn len(&self) -> usize {
        match self {
            SpikeTimestamps::Single(ts) => ts.len(),
            SpikeTimestamps::PerChannel(ts) => ts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<f64> {
        match self {
            SpikeTimestamps::Single(ts) => ts.get(idx).copied(),
            SpikeTimestamps::PerChannel(ts) => ts.get(idx).map(|cols| cols[0]),
        }
    }
}

impl<'a> From<&'a [f64]> for SpikeTimestamps<'a> {
    fn from(ts: &'a [f64]) -> Self {
        SpikeTimestamps::Single(ts)
    }
}

impl<'a> From<&'a Vec<f64>> for SpikeTimestamps<'a> {
    fn from(ts: &'a Vec<f64>) -> Self {
        SpikeTimestamps::Single(ts)
    }
}

impl<'a> From<&'a [[f64; TETRODE_CHANNELS]]> for SpikeTimestamps<'a> {
    fn from(ts: &'a [[f64; TETRODE_CHANNELS]]) -> Self {
        SpikeTimestamps::PerChannel(ts)
    }
}

#[derive(Debug, Clone)]
pub struct EegData {
    pub header: Header,
    /// Raw sample units, no scaling applied.
    pub samples: Vec<f64>,
}

impl EegData {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Recording length in seconds, when the sample rate is known.
    pub fn duration(&self) -> Option<f64> {
        self.header
            .sample_rate()
            .filter(|rate| *rate > 0.0)
            .map(|rate| self.samples.len() as f64 / rate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    DigitalInput,
    DigitalOutput,
    KeyPress,
}

impl EventKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            EVENT_DIGITAL_INPUT => Some(EventKind::DigitalInput),
            EVENT_DIGITAL_OUTPUT => Some(EventKind::DigitalOutput),
            EVENT_KEY_PRESS => Some(EventKind::KeyPress),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            EventKind::DigitalInput => EVENT_DIGITAL_INPUT,
            EventKind::DigitalOutput => EVENT_DIGITAL_OUTPUT,
            EventKind::KeyPress => EVENT_KEY_PRESS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventRecord {
    pub timestamp: f64,
    pub kind: EventKind,
    /// Always 0 for key presses.
    pub channel_state: i16,
}

#[derive(Debug, Clone)]
pub struct InputData {
    pub header: Header,
    pub timestamps: Vec<f64>,
    pub event_types: Vec<EventKind>,
    pub channel_states: Vec<i16>,
}

impl InputData {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn events(&self) -> Vec<EventRecord> {
        self.timestamps
            .iter()
            .zip(&self.event_types)
            .zip(&self.channel_states)
            .map(|((&timestamp, &kind), &channel_state)| EventRecord {
                timestamp,
                kind,
                channel_state,
            })
            .collect()
    }
}

/// File family, inferred from the extension DACQ gives each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DacqFormat {
    Tetrode,
    Eeg,
    Input,
}

impl DacqFormat {
    /// `.1`-`.16` are tetrodes, `.eeg`/`.egf` (optionally numbered) are
    /// continuous channels and `.inp` holds input events.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();

        if let Ok(n) = ext.parse::<u8>() {
            return (1..=16).contains(&n).then_some(DacqFormat::Tetrode);
        }
        if ext == "inp" {
            return Some(DacqFormat::Input);
        }
        for prefix in ["eeg", "egf"] {
            if let Some(rest) = ext.strip_prefix(prefix) {
                if rest.is_empty() || rest.chars().all(|c| c.is_ascii_digit()) {
                    return Some(DacqFormat::Eeg);
                }
            }
        }
        None
    }
}
