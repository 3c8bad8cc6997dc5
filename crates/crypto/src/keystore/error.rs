//! Keystore error types

use thiserror::Error;

/// Errors that can occur during keystore operations
#[derive(Error, Debug)]
pub enum KeystoreError {
    /// MAC verification failed: wrong password or tampered ciphertext
    #[error("invalid password: MAC verification failed")]
    InvalidPassword,

    /// Unsupported KDF function
    #[error("unsupported KDF function: {0}")]
    UnsupportedKdf(String),

    /// Unsupported cipher function
    #[error("unsupported cipher function: {0}")]
    UnsupportedCipher(String),

    /// Keystore version other than 3
    #[error("unsupported keystore version: {0}")]
    UnsupportedVersion(u32),

    /// Invalid KDF parameters
    #[error("invalid KDF parameters: {0}")]
    InvalidKdfParams(String),

    /// Invalid cipher parameters
    #[error("invalid cipher parameters: {0}")]
    InvalidCipherParams(String),

    /// Record has no `address` field
    #[error("keystore has no address field")]
    MissingAddress,

    /// Decrypted key does not belong to the address stored in the record
    #[error("address mismatch: record says {stored}, key derives {derived}")]
    AddressMismatch { stored: String, derived: String },

    /// Key derivation failed
    #[error("key derivation failed: {0}")]
    KdfError(String),

    /// Encryption/decryption failed
    #[error("cipher operation failed: {0}")]
    CipherError(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid hex encoding
    #[error("invalid hex encoding: {0}")]
    HexError(String),
}

/// Result type for keystore operations
pub type KeystoreResult<T> = Result<T, KeystoreError>;
