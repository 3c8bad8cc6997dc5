//! Version 3 password-encrypted keystore
//!
//! The record format interoperates with other Ethereum-style wallets:
//!
//! - scrypt KDF for new records (pbkdf2/hmac-sha256 records still decrypt)
//! - AES-128-CTR symmetric encryption with the first half of the derived key
//! - keccak256 MAC over the second half of the derived key and the ciphertext
//! - JSON serialization, handed to callers as an opaque string
//!
//! # Security Properties
//!
//! - The MAC is verified in constant time before any decryption happens
//! - A wrong password and a tampered record fail with the same error
//! - KDF parameters travel inside the record, so decryption is self-describing
//!
//! # Example
//!
//! ```rust,ignore
//! use ecsign_crypto::keystore::{KdfConfig, KeystoreRecord};
//!
//! let record = KeystoreRecord::encrypt(&keypair, "my-strong-password", &KdfConfig::standard())?;
//! let json = record.to_json()?;
//!
//! let keypair = KeystoreRecord::from_json(&json)?.decrypt("my-strong-password")?;
//! ```

mod cipher;
mod error;
mod kdf;
mod mac;
mod record;

pub use self::cipher::{decrypt_secret, encrypt_secret, CipherParams, CIPHER_AES_128_CTR, IV_LENGTH};
pub use error::{KeystoreError, KeystoreResult};
pub use kdf::{
    pbkdf2_derive_key, scrypt_derive_key, KdfConfig, KdfParams, KDF_PBKDF2, KDF_SCRYPT,
    SALT_LENGTH,
};
pub use mac::{compute_mac, verify_mac, MAC_LENGTH};
pub use record::{CryptoSection, KeystoreRecord, KEYSTORE_VERSION};
