// DACQ recording file codec
// Main library entry point

pub mod core;
pub mod utils;

// Re-export main types
pub use crate::core::eeg::EegCodec;
pub use crate::core::endian::{ByteOrder, EndianNormalizer};
pub use crate::core::error::{DacqError, Result};
pub use crate::core::format::{
    DacqFormat, EegData, EventKind, EventRecord, InputData, SpikeRecord, SpikeTimestamps,
    SpikeWaveforms, TetrodeData, Waveform,
};
pub use crate::core::header::{Header, HeaderValue};
pub use crate::core::input::InputEventCodec;
pub use crate::core::reader::{
    read_eeg, read_input, read_tetrode, write_eeg, write_input, write_tetrode, DacqCodec, DacqFile,
};
pub use crate::core::tetrode::TetrodeCodec;
pub use crate::utils::conf_helper::CodecOptions;

#[cfg(test)]
mod tests {
    #[test]
    fn test_constants() {
        use crate::core::constants::*;
        assert_eq!(DATA_START, b"\r\ndata_start");
        assert_eq!(DATA_END, b"\r\ndata_end");
        assert_eq!(SPIKE_RECORD_SIZE, 216);
        assert_eq!(EVENT_RECORD_SIZE, 7);
    }

    #[test]
    fn test_key_press_scenario() {
        use crate::{DacqError, EventKind, InputEventCodec};
        use crate::core::sentinel::emit;

        let codec = InputEventCodec::default();
        let key = emit("timebase 96000 hz\n", &[0x00, 0x00, 0x27, 0x10, 0x4b, 0x4f, 0x49]);
        let data = codec.decode(&key).unwrap();
        assert_eq!(data.event_types, vec![EventKind::KeyPress]);
        assert_eq!(data.channel_states, vec![0]);

        let bad = emit("timebase 96000 hz\n", &[0x00, 0x00, 0x27, 0x10, 0x58, 0x00, 0x00]);
        assert!(matches!(codec.decode(&bad), Err(DacqError::UnknownEventType { byte: 0x58, .. })));
    }
}
