//! Signer capability.
//!
//! Key material stays behind the `Signer` trait: the engine only ever
//! sees an address and a signing operation. Signing is safe to invoke
//! concurrently for independent orders.

use crate::error::{ExecutorError, ExecutorResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use copybot_core::SuiAddress;
use ed25519_dalek::{Signer as DalekSigner, SigningKey};
use zeroize::Zeroizing;

/// Sui signature scheme identifier for ed25519.
pub const SIGNATURE_SCHEME_ED25519: u8 = 0x00;

/// A signature with the material needed for submission.
#[derive(Debug, Clone)]
pub struct SignatureBundle {
    /// Signature scheme identifier.
    pub scheme: u8,
    /// Raw signature bytes.
    pub signature: Vec<u8>,
    /// Public key bytes.
    pub public_key: Vec<u8>,
}

impl SignatureBundle {
    /// Serialized form the submission interface accepts:
    /// scheme byte || signature || public key.
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.signature.len() + self.public_key.len());
        out.push(self.scheme);
        out.extend_from_slice(&self.signature);
        out.extend_from_slice(&self.public_key);
        out
    }
}

/// Opaque signing capability.
pub trait Signer: Send + Sync {
    /// Address derived from the signing key.
    fn address(&self) -> SuiAddress;

    /// Sign arbitrary bytes.
    fn sign(&self, bytes: &[u8]) -> ExecutorResult<SignatureBundle>;
}

/// Ed25519 signer backed by a 32-byte secret key.
pub struct Ed25519Signer {
    key: SigningKey,
    address: SuiAddress,
}

impl Ed25519Signer {
    /// Construct from raw secret key bytes.
    ///
    /// The on-chain address is the Blake2b digest of the scheme byte
    /// and public key; that derivation lives with the wallet tooling,
    /// so the address is supplied alongside the key.
    pub fn new(secret: &[u8; 32], address: SuiAddress) -> Self {
        Self {
            key: SigningKey::from_bytes(secret),
            address,
        }
    }

    /// Parse a secret key given as hex (with or without `0x`) or
    /// standard base64.
    pub fn from_encoded(encoded: &str, address: SuiAddress) -> ExecutorResult<Self> {
        let raw: Zeroizing<Vec<u8>> = {
            let stripped = encoded.trim().strip_prefix("0x").unwrap_or(encoded.trim());
            if let Ok(bytes) = hex::decode(stripped) {
                Zeroizing::new(bytes)
            } else {
                Zeroizing::new(
                    BASE64
                        .decode(stripped)
                        .map_err(|e| ExecutorError::Signing(format!("bad key encoding: {e}")))?,
                )
            }
        };
        let secret: [u8; 32] = raw
            .as_slice()
            .try_into()
            .map_err(|_| ExecutorError::Signing(format!("expected 32 key bytes, got {}", raw.len())))?;
        Ok(Self::new(&secret, address))
    }

    /// The verifying key for this signer.
    pub fn public_key(&self) -> [u8; 32] {
        self.key.verifying_key().to_bytes()
    }
}

impl Signer for Ed25519Signer {
    fn address(&self) -> SuiAddress {
        self.address
    }

    fn sign(&self, bytes: &[u8]) -> ExecutorResult<SignatureBundle> {
        let signature = self.key.sign(bytes);
        Ok(SignatureBundle {
            scheme: SIGNATURE_SCHEME_ED25519,
            signature: signature.to_bytes().to_vec(),
            public_key: self.public_key().to_vec(),
        })
    }
}
