//! Keystore MAC: keccak256(derived_key[16..32] || ciphertext)
//!
//! The MAC proves both that the password derived the right key and that the
//! ciphertext was not modified. It is checked before anything is decrypted.

use alloy_primitives::keccak256;
use subtle::ConstantTimeEq;

use super::error::{KeystoreError, KeystoreResult};

/// MAC length in bytes
pub const MAC_LENGTH: usize = 32;

/// Compute the MAC over `derived_key[16..32] || ciphertext`
pub fn compute_mac(derived_key: &[u8], ciphertext: &[u8]) -> KeystoreResult<[u8; MAC_LENGTH]> {
    if derived_key.len() < 32 {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "derived key must be at least 32 bytes, got {}",
            derived_key.len()
        )));
    }

    let mut preimage = Vec::with_capacity(16 + ciphertext.len());
    preimage.extend_from_slice(&derived_key[16..32]);
    preimage.extend_from_slice(ciphertext);

    Ok(keccak256(&preimage).0)
}

/// Verify a stored MAC in constant time.
///
/// Returns `Err(InvalidPassword)` on mismatch, including a stored MAC of the
/// wrong length.
pub fn verify_mac(derived_key: &[u8], ciphertext: &[u8], expected: &[u8]) -> KeystoreResult<()> {
    let computed = compute_mac(derived_key, ciphertext)?;

    if bool::from(computed.as_slice().ct_eq(expected)) {
        Ok(())
    } else {
        Err(KeystoreError::InvalidPassword)
    }
}
