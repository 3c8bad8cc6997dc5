//! Recoverable secp256k1 signatures.
//!
//! Wire format: 65 bytes `r (32) || s (32) || v (1)`, carried as `0x` hex.
//!
//! The recovery byte `v` circulates in two encodings of the same value:
//! the parity form {0, 1} that this crate emits, and the legacy form
//! {27, 28}. [`VEncoding`] names the encoding and [`YParity`] holds the value,
//! so the two cannot be mixed up by arithmetic on a raw byte.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CryptoError, CryptoResult};
use crate::hash::Digest;
use crate::secp256k1::Secp256k1SecretKey;

/// Serialized signature length
pub const SIGNATURE_LENGTH: usize = 65;

/// Offset between the legacy and parity encodings of `v`
const LEGACY_V_OFFSET: u8 = 27;

/// Parity of the y coordinate of the signature's R point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YParity {
    Even,
    Odd,
}

impl YParity {
    pub fn from_odd(odd: bool) -> Self {
        if odd {
            YParity::Odd
        } else {
            YParity::Even
        }
    }

    pub fn is_odd(self) -> bool {
        matches!(self, YParity::Odd)
    }

    /// The other parity
    pub fn flipped(self) -> Self {
        match self {
            YParity::Even => YParity::Odd,
            YParity::Odd => YParity::Even,
        }
    }
}

/// Encoding of the recovery byte `v`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VEncoding {
    /// v in {0, 1}; emitted by this crate
    Parity,
    /// v in {27, 28}
    Legacy,
}

impl VEncoding {
    /// Classify and decode a raw `v` byte. Any byte outside both domains is rejected.
    pub fn decode(v: u8) -> CryptoResult<(VEncoding, YParity)> {
        match v {
            0 | 1 => Ok((VEncoding::Parity, YParity::from_odd(v == 1))),
            27 | 28 => Ok((
                VEncoding::Legacy,
                YParity::from_odd(v - LEGACY_V_OFFSET == 1),
            )),
            other => Err(CryptoError::RecoveryFailure(format!(
                "recovery byte {} is outside {{0,1}} and {{27,28}}",
                other
            ))),
        }
    }

    /// Encode a parity in this encoding
    pub fn encode(self, parity: YParity) -> u8 {
        let bit = u8::from(parity.is_odd());
        match self {
            VEncoding::Parity => bit,
            VEncoding::Legacy => bit + LEGACY_V_OFFSET,
        }
    }
}

/// Recoverable ECDSA signature over a 32-byte digest
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoverableSignature {
    r: [u8; 32],
    s: [u8; 32],
    parity: YParity,
}

impl RecoverableSignature {
    pub fn new(r: [u8; 32], s: [u8; 32], parity: YParity) -> Self {
        Self { r, s, parity }
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    pub fn parity(&self) -> YParity {
        self.parity
    }

    /// Wire bytes with `v` in the parity encoding
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.to_bytes_with(VEncoding::Parity)
    }

    /// Wire bytes with `v` in the requested encoding
    pub fn to_bytes_with(&self, encoding: VEncoding) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = encoding.encode(self.parity);
        bytes
    }

    /// Parse 65 wire bytes; `v` may be in either encoding.
    ///
    /// Only the length and `v` are checked here. Range checks on r and s
    /// happen at recovery.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(CryptoError::RecoveryFailure(format!(
                "signature must be {} bytes, got {}",
                SIGNATURE_LENGTH,
                bytes.len()
            )));
        }

        let (_, parity) = VEncoding::decode(bytes[64])?;
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);

        Ok(Self { r, s, parity })
    }

    /// `0x`-prefixed hex of the wire bytes
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Parse hex with or without `0x` prefix
    pub fn from_hex(input: &str) -> CryptoResult<Self> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes = hex::decode(digits)
            .map_err(|e| CryptoError::RecoveryFailure(format!("invalid signature hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RecoverableSignature(r={}, parity={:?})",
            hex::encode(&self.r[..8]),
            self.parity
        )
    }
}

impl fmt::Display for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RecoverableSignature {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Sign a digest with a raw private key.
///
/// The key is range-checked here even when it came from a decrypted
/// keystore: it must be 32 bytes, non-zero and below the curve order.
pub fn sign(digest: &Digest, private_key: &[u8]) -> CryptoResult<RecoverableSignature> {
    Secp256k1SecretKey::from_slice(private_key)?.sign_digest(digest)
}
