// Byte-order normalization between big-endian file fields and the host

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        ByteOrder::native()
    }
}

/// Converts big-endian file fields to and from a (possibly simulated) host layout.
///
/// On a little-endian host the bytes are reversed into host order and read
/// as little-endian; on a big-endian host they pass through and are read as
/// big-endian. Either way the resulting integer is the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndianNormalizer {
    host: ByteOrder,
}

impl EndianNormalizer {
    pub const fn new(host: ByteOrder) -> Self {
        Self { host }
    }

    pub const fn host(&self) -> ByteOrder {
        self.host
    }

    fn reorder<const N: usize>(&self, mut bytes: [u8; N]) -> [u8; N] {
        if self.host == ByteOrder::Little {
            bytes.reverse();
        }
        bytes
    }

    pub fn to_host_i32(&self, file_bytes: [u8; 4]) -> i32 {
        let host_bytes = self.reorder(file_bytes);
        match self.host {
            ByteOrder::Big => i32::from_be_bytes(host_bytes),
            ByteOrder::Little => i32::from_le_bytes(host_bytes),
        }
    }

    pub fn to_file_i32(&self, value: i32) -> [u8; 4] {
        let host_bytes = match self.host {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        };
        self.reorder(host_bytes)
    }

    pub fn to_host_i16(&self, file_bytes: [u8; 2]) -> i16 {
        let host_bytes = self.reorder(file_bytes);
        match self.host {
            ByteOrder::Big => i16::from_be_bytes(host_bytes),
            ByteOrder::Little => i16::from_le_bytes(host_bytes),
        }
    }

    pub fn to_file_i16(&self, value: i16) -> [u8; 2] {
        let host_bytes = match self.host {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        };
        self.reorder(host_bytes)
    }

    // Single-byte fields have no order.
    pub fn to_host_i8(&self, file_byte: u8) -> i8 {
        file_byte as i8
    }

    pub fn to_file_i8(&self, value: i8) -> u8 {
        value as u8
    }

    /// Reads a big-endian i32 at `offset`. Callers guarantee the bounds.
    pub(crate) fn read_i32(&self, bytes: &[u8], offset: usize) -> i32 {
        let mut field = [0u8; 4];
        field.copy_from_slice(&bytes[offset..offset + 4]);
        self.to_host_i32(field)
    }

    pub(crate) fn read_i16(&self, bytes: &[u8], offset: usize) -> i16 {
        let mut field = [0u8; 2];
        field.copy_from_slice(&bytes[offset..offset + 2]);
        self.to_host_i16(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIG: EndianNormalizer = EndianNormalizer::new(ByteOrder::Big);
    const LITTLE: EndianNormalizer = EndianNormalizer::new(ByteOrder::Little);

    #[test]
    fn test_known_values() {
        for n in [BIG, LITTLE] {
            assert_eq!(n.to_host_i32([0x00, 0x00, 0x27, 0x10]), 10_000);
            assert_eq!(n.to_host_i32([0xff, 0xff, 0xff, 0xfe]), -2);
            assert_eq!(n.to_host_i16([0x01, 0x02]), 0x0102);
            assert_eq!(n.to_host_i16([0x80, 0x00]), i16::MIN);
            assert_eq!(n.to_file_i32(10_000), [0x00, 0x00, 0x27, 0x10]);
            assert_eq!(n.to_file_i16(-1), [0xff, 0xff]);
        }
    }

    #[test]
    fn test_hosts_agree() {
        for v in [0, 1, -1, i32::MAX, i32::MIN, 0x1234_5678] {
            let file = BIG.to_file_i32(v);
            assert_eq!(file, LITTLE.to_file_i32(v));
            assert_eq!(BIG.to_host_i32(file), v);
            assert_eq!(LITTLE.to_host_i32(file), v);
        }
        for v in [0i16, 7, -300, i16::MAX] {
            let file = LITTLE.to_file_i16(v);
            assert_eq!(BIG.to_host_i16(file), v);
        }
    }

    #[test]
    fn test_single_byte_passthrough() {
        assert_eq!(BIG.to_host_i8(0xff), -1);
        assert_eq!(LITTLE.to_host_i8(0x7f), 127);
        assert_eq!(LITTLE.to_file_i8(-128), 0x80);
    }

    #[test]
    fn test_native_default() {
        assert_eq!(EndianNormalizer::default().host(), ByteOrder::native());
    }
}
