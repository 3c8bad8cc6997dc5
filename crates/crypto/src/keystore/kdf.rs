//! Key Derivation Function (KDF) implementation
//!
//! New keystores are written with scrypt. Existing V3 keystores written with
//! pbkdf2 (hmac-sha256) are still accepted for decryption.

use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::error::{KeystoreError, KeystoreResult};
use crate::secure::SecretBytes;

/// Default scrypt parameters for newly created keystores.
///
/// N=2^18, r=8, p=1 matches the common V3 default and costs roughly 256 MiB
/// and a fraction of a second per derivation on current hardware.
pub const SCRYPT_N: u32 = 262144;
pub const SCRYPT_R: u32 = 8;
pub const SCRYPT_P: u32 = 1;
pub const SCRYPT_DKLEN: u32 = 32;

/// Reduced-cost scrypt parameters (N=4096, p=6), for tests and constrained devices
pub const LIGHT_SCRYPT_N: u32 = 4096;
pub const LIGHT_SCRYPT_P: u32 = 6;

/// Salt length in bytes
pub const SALT_LENGTH: usize = 32;

/// Minimum derived key length: 16 bytes cipher key + 16 bytes MAC key
pub const MIN_DKLEN: u32 = 32;
/// Only the first 32 derived bytes are ever used
pub const MAX_DKLEN: u32 = 64;

/// Upper bounds on parameters read from untrusted records
pub const MAX_SCRYPT_N: u32 = 1 << 20;
pub const MAX_SCRYPT_R: u32 = 32;
pub const MAX_SCRYPT_P: u32 = 16;
/// 128 * n * r bytes of scrypt working memory, capped at 1 GiB
pub const MAX_SCRYPT_MEMORY: u64 = 1 << 30;
pub const MAX_PBKDF2_C: u32 = 10_000_000;

/// The only PRF accepted for pbkdf2 keystores
pub const PBKDF2_PRF: &str = "hmac-sha256";

pub const KDF_SCRYPT: &str = "scrypt";
pub const KDF_PBKDF2: &str = "pbkdf2";

/// Cost parameters used when writing new keystores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct KdfConfig {
    /// CPU/memory cost (power of two)
    pub n: u32,
    /// Block size
    pub r: u32,
    /// Parallelization
    pub p: u32,
    /// Derived key length in bytes
    pub dklen: u32,
}

impl KdfConfig {
    /// Standard parameters for keys that protect real funds.
    pub const fn standard() -> Self {
        Self {
            n: SCRYPT_N,
            r: SCRYPT_R,
            p: SCRYPT_P,
            dklen: SCRYPT_DKLEN,
        }
    }

    /// Light parameters.
    pub const fn light() -> Self {
        Self {
            n: LIGHT_SCRYPT_N,
            r: SCRYPT_R,
            p: LIGHT_SCRYPT_P,
            dklen: SCRYPT_DKLEN,
        }
    }

    pub fn validate(&self) -> KeystoreResult<()> {
        validate_scrypt(self.dklen, self.n, self.r, self.p)
    }
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// KDF parameters as they appear under `crypto.kdfparams`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KdfParams {
    /// scrypt parameters
    Scrypt {
        /// Derived key length in bytes
        dklen: u32,
        /// CPU/memory cost parameter (must be power of 2)
        n: u32,
        /// Parallelization parameter
        p: u32,
        /// Block size parameter
        r: u32,
        /// Salt as hex string
        salt: String,
    },
    /// pbkdf2 parameters
    Pbkdf2 {
        /// Iteration count
        c: u32,
        /// Derived key length in bytes
        dklen: u32,
        /// Pseudo-random function, always "hmac-sha256"
        prf: String,
        /// Salt as hex string
        salt: String,
    },
}

impl KdfParams {
    /// Scrypt parameters for a fresh keystore.
    pub fn new_scrypt(config: &KdfConfig, salt: &[u8]) -> Self {
        KdfParams::Scrypt {
            dklen: config.dklen,
            n: config.n,
            p: config.p,
            r: config.r,
            salt: hex::encode(salt),
        }
    }

    /// Name written to `crypto.kdf`
    pub fn function(&self) -> &'static str {
        match self {
            KdfParams::Scrypt { .. } => KDF_SCRYPT,
            KdfParams::Pbkdf2 { .. } => KDF_PBKDF2,
        }
    }

    pub fn dklen(&self) -> u32 {
        match self {
            KdfParams::Scrypt { dklen, .. } | KdfParams::Pbkdf2 { dklen, .. } => *dklen,
        }
    }

    pub fn salt(&self) -> KeystoreResult<Vec<u8>> {
        let salt = match self {
            KdfParams::Scrypt { salt, .. } | KdfParams::Pbkdf2 { salt, .. } => salt,
        };
        hex::decode(salt).map_err(|e| KeystoreError::HexError(format!("invalid salt hex: {}", e)))
    }

    /// Validate the parameters
    pub fn validate(&self) -> KeystoreResult<()> {
        match self {
            KdfParams::Scrypt { dklen, n, p, r, .. } => validate_scrypt(*dklen, *n, *r, *p)?,
            KdfParams::Pbkdf2 { c, dklen, prf, .. } => {
                validate_dklen(*dklen)?;
                if *c == 0 || *c > MAX_PBKDF2_C {
                    return Err(KeystoreError::InvalidKdfParams(format!(
                        "c must be between 1 and {}",
                        MAX_PBKDF2_C
                    )));
                }
                if prf != PBKDF2_PRF {
                    return Err(KeystoreError::InvalidKdfParams(format!(
                        "unsupported prf: {}",
                        prf
                    )));
                }
            }
        }
        self.salt()
            .map_err(|e| KeystoreError::InvalidKdfParams(e.to_string()))?;
        Ok(())
    }

    /// Derive the key from the given password
    pub fn derive_key(&self, password: &str) -> KeystoreResult<SecretBytes> {
        self.validate()?;
        let salt = self.salt()?;
        match self {
            KdfParams::Scrypt { dklen, n, p, r, .. } => {
                scrypt_derive_key(password, &salt, *n, *r, *p, *dklen as usize)
            }
            KdfParams::Pbkdf2 { c, dklen, .. } => {
                Ok(pbkdf2_derive_key(password, &salt, *c, *dklen as usize))
            }
        }
    }
}

fn validate_dklen(dklen: u32) -> KeystoreResult<()> {
    if !(MIN_DKLEN..=MAX_DKLEN).contains(&dklen) {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "dklen must be between {} and {}",
            MIN_DKLEN, MAX_DKLEN
        )));
    }
    Ok(())
}

fn validate_scrypt(dklen: u32, n: u32, r: u32, p: u32) -> KeystoreResult<()> {
    validate_dklen(dklen)?;
    // n must be a power of 2 greater than 1
    if n < 2 || !n.is_power_of_two() || n > MAX_SCRYPT_N {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "n must be a power of 2 no greater than {}",
            MAX_SCRYPT_N
        )));
    }
    if r == 0 || r > MAX_SCRYPT_R {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "r must be between 1 and {}",
            MAX_SCRYPT_R
        )));
    }
    if p == 0 || p > MAX_SCRYPT_P {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "p must be between 1 and {}",
            MAX_SCRYPT_P
        )));
    }
    if 128 * u64::from(n) * u64::from(r) > MAX_SCRYPT_MEMORY {
        return Err(KeystoreError::InvalidKdfParams(
            "n * r exceeds the scrypt memory limit".to_string(),
        ));
    }
    Ok(())
}

/// Derive a key using scrypt
///
/// # Arguments
///
/// * `password` - User password
/// * `salt` - Random salt bytes
/// * `n` - CPU/memory cost parameter (must be power of 2)
/// * `r` - Block size parameter
/// * `p` - Parallelization parameter
/// * `dklen` - Desired key length in bytes
pub fn scrypt_derive_key(
    password: &str,
    salt: &[u8],
    n: u32,
    r: u32,
    p: u32,
    dklen: usize,
) -> KeystoreResult<SecretBytes> {
    let log_n = n.trailing_zeros() as u8;

    let params = scrypt::Params::new(log_n, r, p, dklen)
        .map_err(|e| KeystoreError::InvalidKdfParams(e.to_string()))?;

    let mut output = vec![0u8; dklen];
    scrypt::scrypt(password.as_bytes(), salt, &params, &mut output)
        .map_err(|e| KeystoreError::KdfError(e.to_string()))?;

    Ok(SecretBox::new(Box::new(output)))
}

/// Derive a key using pbkdf2 with hmac-sha256
pub fn pbkdf2_derive_key(password: &str, salt: &[u8], c: u32, dklen: usize) -> SecretBytes {
    let mut output = vec![0u8; dklen];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, c, &mut output);
    SecretBox::new(Box::new(output))
}

/// Generate a random salt
pub fn generate_salt() -> Vec<u8> {
    use rand::RngCore;
    let mut salt = vec![0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}
