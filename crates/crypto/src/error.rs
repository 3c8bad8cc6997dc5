//! Cryptographic error types

use thiserror::Error;

use crate::keystore::KeystoreError;

/// Errors surfaced by the account-key pipeline.
///
/// Every failure is terminal for the call that produced it; nothing in this
/// crate retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// MAC check failed during decryption.
    ///
    /// A wrong password and a corrupted record are reported identically.
    #[error("invalid password or corrupted keystore")]
    InvalidPassword,

    /// Keystore JSON missing required fields, or an unknown cipher/KDF
    #[error("malformed keystore record: {0}")]
    MalformedRecord(String),

    /// Private key is not a valid secp256k1 scalar
    #[error("signing failed: {0}")]
    SigningError(String),

    /// Signature is malformed or does not recover to a valid public key
    #[error("signature recovery failed: {0}")]
    RecoveryFailure(String),

    /// Expected address is not 20 bytes of hex
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Caller-supplied settings are out of range, e.g. KDF cost parameters
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected failure from an underlying primitive
    #[error("cryptographic primitive failure: {0}")]
    PrimitiveFailure(String),
}

/// Result type for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;

impl From<KeystoreError> for CryptoError {
    fn from(err: KeystoreError) -> Self {
        match err {
            KeystoreError::InvalidPassword => CryptoError::InvalidPassword,
            KeystoreError::UnsupportedKdf(_)
            | KeystoreError::UnsupportedCipher(_)
            | KeystoreError::UnsupportedVersion(_)
            | KeystoreError::InvalidKdfParams(_)
            | KeystoreError::InvalidCipherParams(_)
            | KeystoreError::HexError(_)
            | KeystoreError::JsonError(_)
            | KeystoreError::MissingAddress
            | KeystoreError::AddressMismatch { .. } => CryptoError::MalformedRecord(err.to_string()),
            KeystoreError::KdfError(_) | KeystoreError::CipherError(_) | KeystoreError::IoError(_) => {
                CryptoError::PrimitiveFailure(err.to_string())
            }
        }
    }
}
