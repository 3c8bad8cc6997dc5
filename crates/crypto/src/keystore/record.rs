//! Version 3 keystore record
//!
//! Combines the KDF, cipher and MAC modules into the JSON document shared
//! with other wallets:
//!
//! ```json
//! {
//!   "address": "...",
//!   "crypto": {
//!     "cipher": "aes-128-ctr",
//!     "cipherparams": { "iv": "..." },
//!     "ciphertext": "...",
//!     "kdf": "scrypt",
//!     "kdfparams": { "dklen": 32, "n": 262144, "p": 1, "r": 8, "salt": "..." },
//!     "mac": "..."
//!   },
//!   "id": "3198bc9c-6672-5ab3-d995-4942343ae5b6",
//!   "version": 3
//! }
//! ```

use std::fs;
use std::path::Path;

use alloy_primitives::Address;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cipher::{decrypt_secret, encrypt_secret, generate_iv, CipherParams, CIPHER_AES_128_CTR};
use super::error::{KeystoreError, KeystoreResult};
use super::kdf::{generate_salt, KdfConfig, KdfParams};
use super::mac::{compute_mac, verify_mac};
use crate::address::{parse_address, to_unprefixed_hex};
use crate::secp256k1::{Secp256k1KeyPair, Secp256k1SecretKey};
use crate::secure::SecretBytes;

/// Keystore format version
pub const KEYSTORE_VERSION: u32 = 3;

/// Password-encrypted private key with everything needed to decrypt it.
///
/// Immutable once created. Decrypted on demand; the plaintext key is never
/// kept alongside the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeystoreRecord {
    /// Address as lower-case hex without `0x`.
    ///
    /// Always written; tolerated as absent on input for older records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Crypto parameters and ciphertext
    #[serde(alias = "Crypto")]
    pub crypto: CryptoSection,
    /// Unique identifier
    pub id: String,
    /// Format version, always 3
    pub version: u32,
}

/// The `crypto` object of a V3 keystore
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CryptoSection {
    pub cipher: String,
    pub cipherparams: CipherParams,
    /// Encrypted private key as hex
    pub ciphertext: String,
    pub kdf: String,
    pub kdfparams: KdfParams,
    /// keccak256(dk[16..32] || ciphertext) as hex
    pub mac: String,
}

impl CryptoSection {
    fn ciphertext(&self) -> KeystoreResult<Vec<u8>> {
        hex::decode(&self.ciphertext)
            .map_err(|e| KeystoreError::HexError(format!("invalid ciphertext hex: {}", e)))
    }

    fn mac(&self) -> KeystoreResult<Vec<u8>> {
        hex::decode(&self.mac)
            .map_err(|e| KeystoreError::HexError(format!("invalid mac hex: {}", e)))
    }
}

impl KeystoreRecord {
    /// Encrypt a key pair under `password` with scrypt at the given cost.
    ///
    /// Salt, IV and id are freshly generated for every call.
    pub fn encrypt(
        keypair: &Secp256k1KeyPair,
        password: &str,
        config: &KdfConfig,
    ) -> KeystoreResult<Self> {
        config.validate()?;

        let salt = generate_salt();
        let iv = generate_iv();

        let kdfparams = KdfParams::new_scrypt(config, &salt);
        let derived_key = kdfparams.derive_key(password)?;
        let dk_bytes = derived_key.expose_secret();

        let secret = keypair.secret_key.to_bytes();
        let ciphertext = encrypt_secret(secret.as_slice(), dk_bytes, &iv)?;
        let mac = compute_mac(dk_bytes, &ciphertext)?;

        Ok(KeystoreRecord {
            address: Some(to_unprefixed_hex(&keypair.address())),
            crypto: CryptoSection {
                cipher: CIPHER_AES_128_CTR.to_string(),
                cipherparams: CipherParams::new(&iv),
                ciphertext: hex::encode(&ciphertext),
                kdf: kdfparams.function().to_string(),
                kdfparams,
                mac: hex::encode(mac),
            },
            id: Uuid::new_v4().to_string(),
            version: KEYSTORE_VERSION,
        })
    }

    /// Check that the record is self-consistent before deriving anything.
    pub fn validate(&self) -> KeystoreResult<()> {
        if self.version != KEYSTORE_VERSION {
            return Err(KeystoreError::UnsupportedVersion(self.version));
        }

        let crypto = &self.crypto;
        if crypto.cipher != CIPHER_AES_128_CTR {
            return Err(KeystoreError::UnsupportedCipher(crypto.cipher.clone()));
        }
        if crypto.kdf != crypto.kdfparams.function() {
            return Err(KeystoreError::UnsupportedKdf(format!(
                "{} (parameters describe {})",
                crypto.kdf,
                crypto.kdfparams.function()
            )));
        }

        crypto.kdfparams.validate()?;
        crypto.cipherparams.iv()?;
        crypto.ciphertext()?;
        crypto.mac()?;
        self.stored_address()?;
        Ok(())
    }

    /// Decrypt the raw private key bytes.
    ///
    /// The MAC is verified in constant time before the ciphertext is
    /// touched. A wrong password and a tampered record both yield
    /// `InvalidPassword`.
    pub fn decrypt_secret(&self, password: &str) -> KeystoreResult<SecretBytes> {
        self.validate()?;

        let derived_key = self.crypto.kdfparams.derive_key(password)?;
        let dk_bytes = derived_key.expose_secret();

        let ciphertext = self.crypto.ciphertext()?;
        verify_mac(dk_bytes, &ciphertext, &self.crypto.mac()?)?;

        let iv = self.crypto.cipherparams.iv()?;
        decrypt_secret(&ciphertext, dk_bytes, &iv)
    }

    /// Decrypt and rebuild the key pair.
    ///
    /// When the record carries an address, the recovered key must derive it.
    pub fn decrypt(&self, password: &str) -> KeystoreResult<Secp256k1KeyPair> {
        let secret = self.decrypt_secret(password)?;
        let secret_key = Secp256k1SecretKey::from_slice(secret.expose_secret())
            .map_err(|_| KeystoreError::InvalidPassword)?;
        let keypair = Secp256k1KeyPair::from_secret_key(secret_key);

        if let Some(stored) = self.stored_address()? {
            let derived = keypair.address();
            if stored != derived {
                return Err(KeystoreError::AddressMismatch {
                    stored: to_unprefixed_hex(&stored),
                    derived: to_unprefixed_hex(&derived),
                });
            }
        }

        Ok(keypair)
    }

    /// The public address, available without the password
    pub fn address(&self) -> KeystoreResult<Address> {
        self.stored_address()?.ok_or(KeystoreError::MissingAddress)
    }

    fn stored_address(&self) -> KeystoreResult<Option<Address>> {
        self.address
            .as_deref()
            .map(|hex| parse_address(hex).map_err(|e| KeystoreError::HexError(e.to_string())))
            .transpose()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Compact JSON, the form handed to callers
    pub fn to_json(&self) -> KeystoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> KeystoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save keystore to a file
    ///
    /// Creates parent directories and restricts the file to 0600 on Unix.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> KeystoreResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, permissions)?;
        }

        Ok(())
    }

    /// Load keystore from a file
    pub fn load<P: AsRef<Path>>(path: P) -> KeystoreResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}
