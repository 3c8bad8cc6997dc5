//! Cryptographic core for ecsign accounts
//!
//! This crate provides:
//! - SHA-256 message digests
//! - Version 3 password-encrypted keystores (scrypt + AES-128-CTR + keccak MAC)
//! - Deterministic recoverable secp256k1 signatures
//! - Signer address recovery and validation
//!
//! Everything here is synchronous. Async wrappers live in `ecsign-account`.

pub mod address;
pub mod error;
pub mod hash;
pub mod keystore;
pub mod recovery;
pub mod secp256k1;
pub mod secure;
pub mod signature;

pub use alloy_primitives::Address;

pub use address::{parse_address, to_prefixed_hex, to_unprefixed_hex};
pub use error::{CryptoError, CryptoResult};
pub use hash::{hash, Digest};
pub use keystore::{KdfConfig, KeystoreError, KeystoreRecord};
pub use recovery::{recover, recover_public_key, validate, validate_hex};
pub use secp256k1::{Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1SecretKey};
pub use secure::{IntoSecret, SecretBytes, SecretString};
pub use signature::{sign, RecoverableSignature, VEncoding, YParity, SIGNATURE_LENGTH};
