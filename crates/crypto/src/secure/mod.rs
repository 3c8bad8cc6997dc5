//! Secure memory handling for cryptographic material
//!
//! Passwords, derived keys and decrypted key bytes live in `secrecy`
//! containers:
//!
//! - Memory is zeroed on drop via `zeroize`
//! - Debug output is redacted
//! - Access requires an explicit `expose_secret()`

mod secret;

pub use secret::{IntoSecret, SecretBytes, SecretString};
