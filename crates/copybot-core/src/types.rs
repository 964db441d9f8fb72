//! Chain identifier types.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical type tag for the native SUI coin.
pub const SUI_TYPE_TAG: &str = "0x2::sui::SUI";

/// A 32-byte Sui object/account address.
///
/// Parses both the canonical 64-hex-digit form and short forms such as
/// `0x2` (left-padded with zeros, matching on-chain normalization).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiAddress(pub [u8; 32]);

impl SuiAddress {
    pub const LENGTH: usize = 32;

    /// The zero address.
    pub const ZERO: SuiAddress = SuiAddress([0u8; 32]);

    /// Parse from a hex string, with or without the `0x` prefix.
    ///
    /// Short forms are left-padded: `0x2` parses to the address ending
    /// in `..02`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > 64 {
            return Err(CoreError::InvalidAddress(s.to_string()));
        }
        // Left-pad odd/short forms to the full 64 digits.
        let padded = format!("{digits:0>64}");
        let mut out = [0u8; 32];
        hex::decode_to_slice(&padded, &mut out)
            .map_err(|_| CoreError::InvalidAddress(s.to_string()))?;
        Ok(SuiAddress(out))
    }

    /// Construct from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidAddress(format!("{} bytes", bytes.len())))?;
        Ok(SuiAddress(arr))
    }

    /// Raw byte view.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Canonical `0x`-prefixed 64-digit hex form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({})", self.to_hex())
    }
}

impl FromStr for SuiAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for SuiAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SuiAddress::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A transaction digest in its base58 wire form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionDigest(pub String);

impl TransactionDigest {
    pub fn new(s: impl Into<String>) -> Self {
        TransactionDigest(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TransactionDigest {
    fn from(s: &str) -> Self {
        TransactionDigest(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_hex_address() {
        let s = "0xb8d7d9e66a60c239e7a60110efcf8de6c705580ed924d0dde141f4a0e2c90105";
        let addr = SuiAddress::from_hex(s).unwrap();
        assert_eq!(addr.to_hex(), s);
    }

    #[test]
    fn parse_short_address_left_pads() {
        let addr = SuiAddress::from_hex("0x2").unwrap();
        assert_eq!(
            addr.to_hex(),
            "0x0000000000000000000000000000000000000000000000000000000000000002"
        );
        assert_eq!(addr.0[31], 2);
    }

    #[test]
    fn parse_without_prefix() {
        let addr = SuiAddress::from_hex("6").unwrap();
        assert_eq!(addr.0[31], 6);
    }

    #[test]
    fn reject_invalid_hex() {
        assert!(SuiAddress::from_hex("0xzz").is_err());
        assert!(SuiAddress::from_hex("").is_err());
        let too_long = format!("0x{}", "a".repeat(65));
        assert!(SuiAddress::from_hex(&too_long).is_err());
    }

    #[test]
    fn round_trip_bytes() {
        let mut raw = [0u8; 32];
        raw[0] = 0xab;
        let addr = SuiAddress::from_bytes(&raw).unwrap();
        assert_eq!(addr.as_bytes(), &raw);
        assert!(addr.to_hex().starts_with("0xab00"));
    }
}
