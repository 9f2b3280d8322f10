// Format constants for DACQ recording files

pub const DATA_START: &[u8; 12] = b"\r\ndata_start";
pub const DATA_END: &[u8; 10] = b"\r\ndata_end";

// Header keys stored on disk with a trailing " hz"
pub const HZ_SUFFIX: &str = " hz";
pub const HZ_KEYS: [&str; 2] = ["timebase", "sample_rate"];

// Header keys consulted while decoding
pub const KEY_TIMEBASE: &str = "timebase";
pub const KEY_SAMPLE_RATE: &str = "sample_rate";
pub const KEY_BYTES_PER_SAMPLE: &str = "bytes_per_sample";
pub const KEY_NUM_SPIKES: &str = "num_spikes";
pub const KEY_TRIAL_DATE: &str = "trial_date";
pub const KEY_TRIAL_TIME: &str = "trial_time";

// Tetrode spike: 4 x (timestamp(i32) + waveform(50 x i8))
pub const TETRODE_CHANNELS: usize = 4;
pub const SAMPLES_PER_SPIKE: usize = 50;
pub const TIMESTAMP_SIZE: usize = 4;
pub const CHANNEL_BLOCK_SIZE: usize = TIMESTAMP_SIZE + SAMPLES_PER_SPIKE; // 54 bytes
pub const SPIKE_RECORD_SIZE: usize = TETRODE_CHANNELS * CHANNEL_BLOCK_SIZE; // 216 bytes

// Input event: timestamp(i32) type(u8) channel_state(i16)
pub const EVENT_RECORD_SIZE: usize = 4 + 1 + 2; // 7 bytes

// Event type codes
pub const EVENT_DIGITAL_INPUT: u8 = b'I';
pub const EVENT_DIGITAL_OUTPUT: u8 = b'O';
pub const EVENT_KEY_PRESS: u8 = b'K';
