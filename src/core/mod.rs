pub mod constants;
pub mod eeg;
pub mod endian;
pub mod error;
pub mod format;
pub mod header;
pub mod input;
mod layout;
pub mod reader;
pub mod sentinel;
pub mod tetrode;
