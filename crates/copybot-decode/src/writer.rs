//! BCS writer, the encoding mirror of `BcsCursor`.
//!
//! Used by the transaction builder for instruction serialization and by
//! tests to construct synthetic event payloads. Unlike the cursor,
//! string lengths are written as full ULEB128 since serialized
//! transactions may carry type tags of any length.

use copybot_core::SuiAddress;

/// Append-only BCS output buffer.
#[derive(Debug, Default)]
pub struct BcsWriter {
    buf: Vec<u8>,
}

impl BcsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn write_bool(&mut self, v: bool) -> &mut Self {
        self.write_u8(v as u8)
    }

    pub fn write_u16_le(&mut self, v: u16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn write_u32_le(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn write_u64_le(&mut self, v: u64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn write_u128_le(&mut self, v: u128) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn write_fixed_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn write_address(&mut self, addr: &SuiAddress) -> &mut Self {
        self.write_fixed_bytes(addr.as_bytes())
    }

    /// Write a ULEB128-encoded length.
    pub fn write_uleb128(&mut self, mut v: u64) -> &mut Self {
        loop {
            let byte = (v & 0x7f) as u8;
            v >>= 7;
            if v == 0 {
                self.buf.push(byte);
                break;
            }
            self.buf.push(byte | 0x80);
        }
        self
    }

    /// Write a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, s: &str) -> &mut Self {
        self.write_uleb128(s.len() as u64);
        self.write_fixed_bytes(s.as_bytes())
    }

    /// Write a length-prefixed byte vector.
    pub fn write_vec_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_uleb128(bytes.len() as u64);
        self.write_fixed_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::BcsCursor;

    #[test]
    fn writer_cursor_round_trip() {
        let addr = SuiAddress::from_hex("0xb8d7").unwrap();
        let mut w = BcsWriter::new();
        w.write_address(&addr)
            .write_u64_le(123)
            .write_bool(true)
            .write_string("0x2::sui::SUI");
        let bytes = w.into_bytes();

        let mut cur = BcsCursor::new(&bytes);
        assert_eq!(cur.read_address().unwrap(), addr);
        assert_eq!(cur.read_u64_le().unwrap(), 123);
        assert!(cur.read_bool().unwrap());
        assert_eq!(cur.read_string().unwrap(), "0x2::sui::SUI");
        assert_eq!(cur.remaining(), 0);
    }

    #[test]
    fn uleb128_single_and_multi_byte() {
        let mut w = BcsWriter::new();
        w.write_uleb128(127);
        assert_eq!(w.into_bytes(), vec![0x7f]);

        let mut w = BcsWriter::new();
        w.write_uleb128(128);
        assert_eq!(w.into_bytes(), vec![0x80, 0x01]);
    }
}
