//! Secp256k1 key material for address-based accounts
//!
//! - Address derivation: keccak256(uncompressed_pubkey[1..])[12..]
//! - Recoverable signing over a precomputed [`Digest`]
//!
//! Uses the k256 crate for curve operations.

use alloy_primitives::{keccak256, Address};
use k256::{
    ecdsa::{SigningKey, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
    SecretKey as K256SecretKey,
};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};
use crate::hash::Digest;
use crate::signature::{RecoverableSignature, YParity};

/// Private key length in bytes
pub const SECRET_KEY_LENGTH: usize = 32;

/// Secp256k1 secret key: a non-zero scalar below the curve order.
///
/// The inner k256 key zeroizes its scalar on drop.
#[derive(Clone)]
pub struct Secp256k1SecretKey(K256SecretKey);

impl Secp256k1SecretKey {
    /// Generate a new random secret key
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        Self(K256SecretKey::random(rng))
    }

    /// Load from raw bytes (32-byte big-endian scalar)
    pub fn from_bytes(bytes: &[u8; SECRET_KEY_LENGTH]) -> CryptoResult<Self> {
        K256SecretKey::from_bytes(bytes.into())
            .map(Self)
            .map_err(|_| CryptoError::SigningError("scalar is zero or not below the curve order".into()))
    }

    /// Load from a slice, which must be exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let array: &[u8; SECRET_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            CryptoError::SigningError(format!(
                "private key must be {} bytes, got {}",
                SECRET_KEY_LENGTH,
                bytes.len()
            ))
        })?;
        Self::from_bytes(array)
    }

    /// Serialize to bytes; the copy is zeroized when dropped
    pub fn to_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_LENGTH]> {
        Zeroizing::new(self.0.to_bytes().into())
    }

    /// Get the corresponding public key
    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey(self.0.public_key())
    }

    /// Sign a digest with a deterministic (RFC 6979) nonce.
    ///
    /// The returned signature is low-s and carries its y-parity.
    pub fn sign_digest(&self, digest: &Digest) -> CryptoResult<RecoverableSignature> {
        let signing_key = SigningKey::from(&self.0);
        let (signature, recovery_id) = signing_key
            .sign_prehash_recoverable(digest.as_bytes())
            .map_err(|e| CryptoError::SigningError(e.to_string()))?;

        // x-reduced recovery ids cannot be expressed in the 65-byte format
        if recovery_id.is_x_reduced() {
            return Err(CryptoError::SigningError(
                "signature r overflowed the curve order".into(),
            ));
        }

        let (r, s) = signature.split_bytes();
        Ok(RecoverableSignature::new(
            r.into(),
            s.into(),
            YParity::from_odd(recovery_id.is_y_odd()),
        ))
    }
}

impl std::fmt::Debug for Secp256k1SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1SecretKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Secp256k1 public key
#[derive(Clone, PartialEq, Eq)]
pub struct Secp256k1PublicKey(k256::PublicKey);

impl Secp256k1PublicKey {
    /// Load from SEC1 bytes (33 compressed or 65 uncompressed)
    pub fn from_sec1_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        k256::PublicKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| CryptoError::RecoveryFailure("invalid public key encoding".into()))
    }

    pub(crate) fn from_verifying_key(key: &VerifyingKey) -> Self {
        Self(k256::PublicKey::from(key))
    }

    /// Serialize to compressed bytes (33 bytes)
    pub(crate) fn to_bytes(&self) -> [u8; 33] {
        let encoded = self.0.to_encoded_point(true);
        let mut result = [0u8; 33];
        result.copy_from_slice(encoded.as_bytes());
        result
    }

    /// Serialize to uncompressed bytes (65 bytes, with 0x04 prefix)
    pub fn to_uncompressed_bytes(&self) -> [u8; 65] {
        let encoded = self.0.to_encoded_point(false);
        let mut result = [0u8; 65];
        result.copy_from_slice(encoded.as_bytes());
        result
    }

    /// Derive the 20-byte address from this public key
    pub fn address(&self) -> Address {
        let uncompressed = self.to_uncompressed_bytes();
        // Skip the 0x04 prefix byte
        let hash = keccak256(&uncompressed[1..]);
        Address::from_slice(&hash[12..])
    }
}

impl std::fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.to_bytes();
        write!(f, "Secp256k1PublicKey({})", hex::encode(&bytes[..8]))
    }
}

/// Secp256k1 key pair.
///
/// Exists only for the duration of an operation: created at account
/// creation or after keystore decryption, then dropped.
#[derive(Clone)]
pub struct Secp256k1KeyPair {
    pub secret_key: Secp256k1SecretKey,
    pub public_key: Secp256k1PublicKey,
}

impl Secp256k1KeyPair {
    /// Generate a new random key pair
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        Self::from_secret_key(Secp256k1SecretKey::generate(rng))
    }

    /// Create from secret key
    pub fn from_secret_key(secret_key: Secp256k1SecretKey) -> Self {
        let public_key = secret_key.public_key();
        Self {
            secret_key,
            public_key,
        }
    }

    /// Sign a digest
    pub fn sign_digest(&self, digest: &Digest) -> CryptoResult<RecoverableSignature> {
        self.secret_key.sign_digest(digest)
    }

    /// Address derived from this key pair
    pub fn address(&self) -> Address {
        self.public_key.address()
    }
}

impl std::fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1KeyPair")
            .field("public_key", &self.public_key)
            .field("address", &self.address())
            .finish()
    }
}
