//! Signer address recovery and signature validation

use alloy_primitives::Address;
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};

use crate::address::parse_address;
use crate::error::{CryptoError, CryptoResult};
use crate::hash::{hash, Digest};
use crate::secp256k1::Secp256k1PublicKey;
use crate::signature::RecoverableSignature;

/// Recover the signer's public key from a digest and signature.
///
/// Fails with `RecoveryFailure` when r or s is zero or not below the curve
/// order, or when no valid point recovers. High-s signatures are accepted:
/// s is replaced by n - s and the parity flipped, which recovers the same key.
pub fn recover_public_key(
    digest: &Digest,
    signature: &RecoverableSignature,
) -> CryptoResult<Secp256k1PublicKey> {
    let sig = K256Signature::from_scalars(*signature.r(), *signature.s())
        .map_err(|_| CryptoError::RecoveryFailure("r or s out of range".into()))?;

    let (sig, parity) = match sig.normalize_s() {
        Some(low) => (low, signature.parity().flipped()),
        None => (sig, signature.parity()),
    };
    let recovery_id = RecoveryId::new(parity.is_odd(), false);

    let verifying_key = VerifyingKey::recover_from_prehash(digest.as_bytes(), &sig, recovery_id)
        .map_err(|e| CryptoError::RecoveryFailure(e.to_string()))?;

    Ok(Secp256k1PublicKey::from_verifying_key(&verifying_key))
}

/// Recover the signer's address from a digest and signature
pub fn recover(digest: &Digest, signature: &RecoverableSignature) -> CryptoResult<Address> {
    recover_public_key(digest, signature).map(|pk| pk.address())
}

/// Check that `signature` over `message` was produced by `expected`.
///
/// A different signer is `Ok(false)`; only structurally invalid input is an error.
pub fn validate(
    message: &[u8],
    signature: &RecoverableSignature,
    expected: &Address,
) -> CryptoResult<bool> {
    let digest = hash(message);
    let recovered = recover(&digest, signature)?;
    Ok(recovered == *expected)
}

/// [`validate`] over transport strings: hex signature and hex address.
pub fn validate_hex(message: &[u8], signature: &str, expected: &str) -> CryptoResult<bool> {
    let expected = parse_address(expected)?;
    let signature = RecoverableSignature::from_hex(signature)?;
    validate(message, &signature, &expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::to_prefixed_hex;
    use crate::secp256k1::Secp256k1KeyPair;
    use crate::signature::{VEncoding, SIGNATURE_LENGTH};

    #[test]
    fn test_sign_recover_agreement() {
        let keypair = Secp256k1KeyPair::generate(&mut rand::thread_rng());
        let digest = hash(b"bla");

        let sig = keypair.sign_digest(&digest).unwrap();
        assert_eq!(recover(&digest, &sig).unwrap(), keypair.address());
        assert_eq!(recover_public_key(&digest, &sig).unwrap(), keypair.public_key);
    }

    #[test]
    fn test_recover_accepts_legacy_v() {
        let keypair = Secp256k1KeyPair::generate(&mut rand::thread_rng());
        let digest = hash(b"legacy v");
        let sig = keypair.sign_digest(&digest).unwrap();

        let legacy = RecoverableSignature::from_bytes(&sig.to_bytes_with(VEncoding::Legacy)).unwrap();
        assert_eq!(recover(&digest, &legacy).unwrap(), keypair.address());
    }

    #[test]
    fn test_high_s_signature_recovers_signer() {
        use k256::elliptic_curve::PrimeField;
        use k256::Scalar;

        let keypair = Secp256k1KeyPair::generate(&mut rand::thread_rng());
        let digest = hash(b"bla");
        let sig = keypair.sign_digest(&digest).unwrap();

        let s = Option::<Scalar>::from(Scalar::from_repr((*sig.s()).into())).unwrap();
        let high_s: [u8; 32] = (-s).to_bytes().into();
        assert_ne!(&high_s, sig.s());

        let high = RecoverableSignature::new(*sig.r(), high_s, sig.parity().flipped());
        assert_eq!(recover(&digest, &high).unwrap(), keypair.address());
        assert!(validate(b"bla", &high, &keypair.address()).unwrap());

        // Same s with the original parity points at a different key
        let wrong_parity = RecoverableSignature::new(*sig.r(), high_s, sig.parity());
        assert_ne!(
            recover(&digest, &wrong_parity).ok(),
            Some(keypair.address())
        );
    }

    #[test]
    fn test_validate_mismatch_is_false() {
        let signer = Secp256k1KeyPair::generate(&mut rand::thread_rng());
        let other = Secp256k1KeyPair::generate(&mut rand::thread_rng());
        let sig = signer.sign_digest(&hash(b"bla")).unwrap();

        assert!(validate(b"bla", &sig, &signer.address()).unwrap());
        assert!(!validate(b"bla", &sig, &other.address()).unwrap());
        assert!(!validate(b"blb", &sig, &signer.address()).unwrap());
    }

    #[test]
    fn test_validate_hex_case_insensitive() {
        let keypair = Secp256k1KeyPair::generate(&mut rand::thread_rng());
        let sig = keypair.sign_digest(&hash(b"case")).unwrap().to_hex();

        let lower = to_prefixed_hex(&keypair.address());
        let upper = format!("0x{}", lower[2..].to_uppercase());
        let checksummed = keypair.address().to_checksum(None);

        assert!(validate_hex(b"case", &sig, &lower).unwrap());
        assert!(validate_hex(b"case", &sig, &upper).unwrap());
        assert!(validate_hex(b"case", &sig, &checksummed).unwrap());
    }

    #[test]
    fn test_zero_r_or_s_is_recovery_failure() {
        let digest = hash(b"zero");
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[32..64].copy_from_slice(&[0x01; 32]);
        let sig = RecoverableSignature::from_bytes(&bytes).unwrap();

        assert!(matches!(
            recover(&digest, &sig),
            Err(CryptoError::RecoveryFailure(_))
        ));
    }

    #[test]
    fn test_r_above_order_is_recovery_failure() {
        let digest = hash(b"overflow");
        let mut bytes = [0xFFu8; SIGNATURE_LENGTH];
        bytes[64] = 0;
        let sig = RecoverableSignature::from_bytes(&bytes).unwrap();

        assert!(matches!(
            recover(&digest, &sig),
            Err(CryptoError::RecoveryFailure(_))
        ));
    }

    #[test]
    fn test_validate_hex_malformed_inputs() {
        let keypair = Secp256k1KeyPair::generate(&mut rand::thread_rng());
        let sig = keypair.sign_digest(&hash(b"m")).unwrap().to_hex();
        let address = to_prefixed_hex(&keypair.address());

        assert!(matches!(
            validate_hex(b"m", &sig[..sig.len() - 2], &address),
            Err(CryptoError::RecoveryFailure(_))
        ));
        assert!(matches!(
            validate_hex(b"m", &sig, "0x1234"),
            Err(CryptoError::InvalidAddress(_))
        ));
    }
}
