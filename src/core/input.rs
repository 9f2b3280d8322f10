// Digital I/O and keypress event files: 7-byte records

use crate::core::constants::EVENT_RECORD_SIZE;
use crate::core::endian::EndianNormalizer;
use crate::core::error::{DacqError, Result};
use crate::core::format::{EventKind, EventRecord, InputData};
use crate::core::header::Header;
use crate::core::layout::{record_count, seconds_to_ticks, split, ticks_to_seconds};
use crate::core::sentinel;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct InputEventCodec {
    endian: EndianNormalizer,
}

impl InputEventCodec {
    pub fn new(endian: EndianNormalizer) -> Self {
        Self { endian }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<InputData> {
        let (header, payload) = split(bytes)?;
        let count = record_count(payload, EVENT_RECORD_SIZE)?;
        let timebase = header.timebase()?;

        let mut timestamps = Vec::with_capacity(count);
        let mut event_types = Vec::with_capacity(count);
        let mut channel_states = Vec::with_capacity(count);

        for (idx, record) in payload.chunks_exact(EVENT_RECORD_SIZE).enumerate() {
            let code = record[4];
            let kind = EventKind::from_code(code).ok_or(DacqError::UnknownEventType {
                byte: code,
                offset: idx * EVENT_RECORD_SIZE + 4,
            })?;

            let state = match kind {
                EventKind::KeyPress => 0,
                _ => self.endian.read_i16(record, 5),
            };

            timestamps.push(ticks_to_seconds(self.endian.read_i32(record, 0), timebase));
            event_types.push(kind);
            channel_states.push(state);
        }

        debug!("decoded {} input events", count);
        Ok(InputData {
            header,
            timestamps,
            event_types,
            channel_states,
        })
    }

    pub fn encode(&self, header: &Header, events: &[EventRecord]) -> Result<Vec<u8>> {
        header.validate()?;
        let timebase = header.timebase()?;
        let mut payload = Vec::with_capacity(events.len() * EVENT_RECORD_SIZE);

        for event in events {
            let ticks = seconds_to_ticks(event.timestamp, timebase)?;
            let state = match event.kind {
                EventKind::KeyPress => 0,
                _ => event.channel_state,
            };
            payload.extend_from_slice(&self.endian.to_file_i32(ticks));
            payload.push(event.kind.code());
            payload.extend_from_slice(&self.endian.to_file_i16(state));
        }

        debug!("encoded {} input events", events.len());
        Ok(sentinel::emit(&header.serialize(), &payload))
    }
}
