// Continuous EEG/EGF files: a flat run of 1- or 2-byte signed samples

use crate::core::endian::EndianNormalizer;
use crate::core::error::{DacqError, Result};
use crate::core::format::EegData;
use crate::core::header::Header;
use crate::core::layout::{record_count, split};
use crate::core::sentinel;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct EegCodec {
    endian: EndianNormalizer,
}

impl EegCodec {
    pub fn new(endian: EndianNormalizer) -> Self {
        Self { endian }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<EegData> {
        let (header, payload) = split(bytes)?;
        let width = header.bytes_per_sample()?;
        let count = record_count(payload, width)?;

        let samples: Vec<f64> = match width {
            1 => payload
                .iter()
                .map(|&b| self.endian.to_host_i8(b) as f64)
                .collect(),
            _ => (0..count)
                .map(|i| self.endian.read_i16(payload, i * 2) as f64)
                .collect(),
        };

        debug!("decoded {} samples of {} byte(s)", samples.len(), width);
        Ok(EegData { header, samples })
    }

    /// Samples must be whole numbers representable in `bytes_per_sample` bytes.
    pub fn encode(&self, header: &Header, samples: &[f64]) -> Result<Vec<u8>> {
        header.validate()?;
        let width = header.bytes_per_sample()?;
        let (min, max) = match width {
            1 => (i8::MIN as f64, i8::MAX as f64),
            _ => (i16::MIN as f64, i16::MAX as f64),
        };

        let mut payload = Vec::with_capacity(samples.len() * width);
        for &sample in samples {
            if !sample.is_finite() || sample.fract() != 0.0 || sample < min || sample > max {
                return Err(DacqError::ValueOutOfRange {
                    what: "sample",
                    value: sample,
                });
            }
            match width {
                1 => payload.push(self.endian.to_file_i8(sample as i8)),
                _ => payload.extend_from_slice(&self.endian.to_file_i16(sample as i16)),
            }
        }

        debug!("encoded {} samples of {} byte(s)", samples.len(), width);
        Ok(sentinel::emit(&header.serialize(), &payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::endian::ByteOrder;

    fn eeg_bytes(header: &str, payload: &[u8]) -> Vec<u8> {
        sentinel::emit(header, payload)
    }

    #[test]
    fn test_decode_single_byte() {
        let bytes = eeg_bytes(
            "sample_rate 250.0 hz\nbytes_per_sample 1\n",
            &[0x00, 0x7f, 0x80, 0xff],
        );
        let data = EegCodec::default().decode(&bytes).unwrap();
        assert_eq!(data.samples, vec![0.0, 127.0, -128.0, -1.0]);
        assert_eq!(data.duration(), Some(4.0 / 250.0));
    }

    #[test]
    fn test_decode_two_byte_big_endian() {
        let bytes = eeg_bytes("bytes_per_sample 2\n", &[0x01, 0x00, 0xff, 0xfe, 0x80, 0x00]);
        for host in [ByteOrder::Big, ByteOrder::Little] {
            let data = EegCodec::new(EndianNormalizer::new(host)).decode(&bytes).unwrap();
            assert_eq!(data.samples, vec![256.0, -2.0, -32768.0]);
        }
    }

    #[test]
    fn test_unsupported_width() {
        let bytes = eeg_bytes("bytes_per_sample 4\n", &[0; 8]);
        assert!(matches!(
            EegCodec::default().decode(&bytes),
            Err(DacqError::UnsupportedSampleWidth(_))
        ));
    }

    #[test]
    fn test_truncated_two_byte_payload() {
        let bytes = eeg_bytes("bytes_per_sample 2\n", &[0; 5]);
        assert!(matches!(
            EegCodec::default().decode(&bytes),
            Err(DacqError::TruncatedPayload { len: 5, record_width: 2, remainder: 1 })
        ));
    }

    #[test]
    fn test_round_trip() {
        let header = Header::parse("sample_rate 4800 hz\nbytes_per_sample 2").unwrap();
        let samples = vec![0.0, -1.0, 32767.0, -32768.0, 1234.0];
        let codec = EegCodec::default();
        let decoded = codec.decode(&codec.encode(&header, &samples).unwrap()).unwrap();
        assert_eq!(decoded.samples, samples);
        assert_eq!(decoded.header, header);
    }

    #[test]
    fn test_encode_rejects_unrepresentable() {
        let header = Header::parse("bytes_per_sample 1").unwrap();
        let codec = EegCodec::default();
        assert!(matches!(
            codec.encode(&header, &[128.0]),
            Err(DacqError::ValueOutOfRange { what: "sample", .. })
        ));
        assert!(codec.encode(&header, &[0.5]).is_err());
    }
}
