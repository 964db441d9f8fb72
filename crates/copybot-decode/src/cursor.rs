//! Bounds-checked read cursor over a BCS payload.
//!
//! Every primitive checks the remaining buffer length before consuming
//! bytes; an under-length buffer yields `DecodeError::Truncated` rather
//! than an out-of-range access.

use crate::error::{DecodeError, DecodeResult};
use copybot_core::SuiAddress;

/// Read position over an event payload.
#[derive(Debug)]
pub struct BcsCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BcsCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current read offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(DecodeError::Truncated {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> DecodeResult<bool> {
        Ok(self.read_u8()? == 1)
    }

    pub fn read_u32_le(&mut self) -> DecodeResult<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_u64_le(&mut self) -> DecodeResult<u64> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_u128_le(&mut self) -> DecodeResult<u128> {
        let bytes = self.take(16)?;
        Ok(u128::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_fixed_bytes(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        self.take(n)
    }

    /// Read a 32-byte address.
    pub fn read_address(&mut self) -> DecodeResult<SuiAddress> {
        let bytes = self.take(SuiAddress::LENGTH)?;
        // take() returned exactly 32 bytes, from_bytes cannot fail
        Ok(SuiAddress::from_bytes(bytes).unwrap())
    }

    /// Read a length-prefixed UTF-8 string.
    ///
    /// The length is a single ULEB128 byte: values with the
    /// continuation bit set (>= 0x80) are rejected as
    /// `DecodeError::InvalidLength` since multi-byte lengths are not
    /// part of the event shapes in scope.
    pub fn read_string(&mut self) -> DecodeResult<String> {
        let len = self.read_u8()?;
        if len & 0x80 != 0 {
            return Err(DecodeError::InvalidLength(len));
        }
        let bytes = self.take(len as usize)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8)
    }

    /// Advance past `n` bytes without interpreting them.
    pub fn skip(&mut self, n: usize) -> DecodeResult<()> {
        self.take(n).map(|_| ())
    }
}
