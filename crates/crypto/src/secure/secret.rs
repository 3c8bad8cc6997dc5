//! Secret wrapper utilities for consistent secret handling
//!
//! Provides type aliases and utilities around the `secrecy` crate for
//! handling passwords and key bytes.

use secrecy::{SecretBox, SecretString as SecrecySecretString};

/// A secret byte vector that is zeroized on drop.
///
/// Holds derived keys and decrypted private keys. The inner value can only
/// be accessed via `expose_secret()`.
///
/// # Example
///
/// ```rust
/// use ecsign_crypto::secure::SecretBytes;
/// use secrecy::ExposeSecret;
///
/// let secret = SecretBytes::new(Box::new(vec![1, 2, 3, 4]));
/// assert_eq!(secret.expose_secret(), &vec![1, 2, 3, 4]);
/// ```
pub type SecretBytes = SecretBox<Vec<u8>>;

/// A secret string that is zeroized on drop.
///
/// Use this for passwords.
///
/// # Example
///
/// ```rust
/// use ecsign_crypto::secure::SecretString;
/// use secrecy::ExposeSecret;
///
/// let password: SecretString = "gft".to_string().into();
/// let value: &str = password.expose_secret();
/// assert_eq!(value, "gft");
/// ```
pub type SecretString = SecrecySecretString;

/// Extension trait for creating secret values.
pub trait IntoSecret {
    /// The secret type this converts into.
    type Secret;

    /// Convert into a secret value.
    fn into_secret(self) -> Self::Secret;
}

impl IntoSecret for String {
    type Secret = SecretString;

    fn into_secret(self) -> Self::Secret {
        self.into()
    }
}

impl IntoSecret for &str {
    type Secret = SecretString;

    fn into_secret(self) -> Self::Secret {
        self.into()
    }
}
