//! Account service for ecsign
//!
//! Ties the keystore codec, digest and signer from `ecsign-crypto` into the
//! three account operations:
//!
//! - [`AccountService::create_account`]: fresh key, returned as a V3 keystore record
//! - [`AccountService::sign_message`]: decrypt a record and sign a message
//! - [`AccountService::validate_signature`]: check a signature against an address
//!
//! Each operation has an `_async` form that runs the work on tokio's
//! blocking pool, as do the digest and keystore codec in [`codec`]. The
//! synchronous forms never touch a runtime.

pub mod codec;
pub mod config;
mod offload;
pub mod service;

pub use codec::{decrypt_record_async, encrypt_record_async, hash_async};
pub use config::AccountConfig;
pub use service::AccountService;

pub use ecsign_crypto::{CryptoError, CryptoResult, KdfConfig};
