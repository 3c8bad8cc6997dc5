//! AES-128-CTR cipher for keystore encryption
//!
//! The first 16 bytes of the derived key are the cipher key. CTR mode keeps
//! the ciphertext the same length as the private key.

use aes::Aes128;
use cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};

use super::error::{KeystoreError, KeystoreResult};
use crate::secure::SecretBytes;

/// Cipher identifier written to `crypto.cipher`
pub const CIPHER_AES_128_CTR: &str = "aes-128-ctr";

/// IV (initialization vector) length for AES-128-CTR
pub const IV_LENGTH: usize = 16;

/// AES-128 key length
pub const AES_KEY_LENGTH: usize = 16;

type Aes128Ctr = Ctr128BE<Aes128>;

/// `crypto.cipherparams`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CipherParams {
    /// Initialization vector as hex string
    pub iv: String,
}

impl CipherParams {
    pub fn new(iv: &[u8]) -> Self {
        Self {
            iv: hex::encode(iv),
        }
    }

    /// Decode and length-check the IV
    pub fn iv(&self) -> KeystoreResult<[u8; IV_LENGTH]> {
        let bytes = hex::decode(&self.iv)
            .map_err(|e| KeystoreError::InvalidCipherParams(format!("invalid IV hex: {}", e)))?;

        bytes.as_slice().try_into().map_err(|_| {
            KeystoreError::InvalidCipherParams(format!(
                "IV must be {} bytes, got {}",
                IV_LENGTH,
                bytes.len()
            ))
        })
    }
}

fn keystream(derived_key: &[u8], iv: &[u8]) -> KeystoreResult<Aes128Ctr> {
    if derived_key.len() < AES_KEY_LENGTH {
        return Err(KeystoreError::InvalidCipherParams(format!(
            "cipher key must be at least {} bytes, got {}",
            AES_KEY_LENGTH,
            derived_key.len()
        )));
    }

    if iv.len() != IV_LENGTH {
        return Err(KeystoreError::InvalidCipherParams(format!(
            "IV must be {} bytes, got {}",
            IV_LENGTH,
            iv.len()
        )));
    }

    Aes128Ctr::new_from_slices(&derived_key[..AES_KEY_LENGTH], iv)
        .map_err(|e| KeystoreError::CipherError(e.to_string()))
}

/// Encrypt secret data using AES-128-CTR
///
/// # Arguments
///
/// * `secret` - The secret data to encrypt
/// * `derived_key` - KDF output; only the first 16 bytes are used
/// * `iv` - 16-byte initialization vector
pub fn encrypt_secret(secret: &[u8], derived_key: &[u8], iv: &[u8]) -> KeystoreResult<Vec<u8>> {
    let mut cipher = keystream(derived_key, iv)?;

    let mut ciphertext = secret.to_vec();
    cipher.apply_keystream(&mut ciphertext);

    Ok(ciphertext)
}

/// Decrypt secret data using AES-128-CTR
///
/// Callers must have verified the MAC first.
pub fn decrypt_secret(
    ciphertext: &[u8],
    derived_key: &[u8],
    iv: &[u8],
) -> KeystoreResult<SecretBytes> {
    let mut cipher = keystream(derived_key, iv)?;

    let mut plaintext = ciphertext.to_vec();
    cipher.apply_keystream(&mut plaintext);

    Ok(SecretBox::new(Box::new(plaintext)))
}

/// Generate a random IV
pub fn generate_iv() -> [u8; IV_LENGTH] {
    use rand::RngCore;
    let mut iv = [0u8; IV_LENGTH];
    rand::thread_rng().fill_bytes(&mut iv);
    iv
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let secret = b"my-secret-key-material-32-bytes!";
        let key = vec![0xAA; 32];
        let iv = vec![0xBB; 16];

        let ciphertext = encrypt_secret(secret, &key, &iv).unwrap();
        assert_eq!(ciphertext.len(), secret.len());
        assert_ne!(&ciphertext, secret);

        let decrypted = decrypt_secret(&ciphertext, &key, &iv).unwrap();
        assert_eq!(decrypted.expose_secret(), secret);
    }

    #[test]
    fn test_only_first_half_of_key_is_used() {
        let secret = [0x42; 32];
        let iv = [0x01; 16];

        let mut key1 = vec![0xAA; 32];
        let key2 = vec![0xAA; 32];
        key1[16..].copy_from_slice(&[0xFF; 16]);

        assert_eq!(
            encrypt_secret(&secret, &key1, &iv).unwrap(),
            encrypt_secret(&secret, &key2, &iv).unwrap()
        );
    }

    #[test]
    fn test_different_iv_different_ciphertext() {
        let secret = b"same-plaintext";
        let key = vec![0xAA; 32];

        let ciphertext1 = encrypt_secret(secret, &key, &[0x11; 16]).unwrap();
        let ciphertext2 = encrypt_secret(secret, &key, &[0x22; 16]).unwrap();
        assert_ne!(ciphertext1, ciphertext2);
    }

    #[test]
    fn test_invalid_key_length() {
        let result = encrypt_secret(b"test", &[0xAA; 8], &[0xBB; 16]);
        assert!(matches!(result, Err(KeystoreError::InvalidCipherParams(_))));
    }

    #[test]
    fn test_invalid_iv_length() {
        let result = encrypt_secret(b"test", &[0xAA; 32], &[0xBB; 8]);
        assert!(matches!(result, Err(KeystoreError::InvalidCipherParams(_))));
    }

    #[test]
    fn test_cipher_params_iv() {
        let params = CipherParams::new(&[0xCC; 16]);
        assert_eq!(params.iv().unwrap(), [0xCC; 16]);

        let short = CipherParams {
            iv: hex::encode([0xCC; 12]),
        };
        assert!(short.iv().is_err());

        let bad_hex = CipherParams {
            iv: "zz".to_string(),
        };
        assert!(bad_hex.iv().is_err());
    }

    #[test]
    fn test_generate_iv() {
        assert_ne!(generate_iv(), generate_iv());
    }
}
