//! Property-based tests for keystore and signature invariants

use ecsign_crypto::{
    hash, recover, validate, CryptoError, KdfConfig, KeystoreRecord, RecoverableSignature,
    Secp256k1KeyPair, Secp256k1SecretKey, VEncoding,
};
use proptest::prelude::*;

fn tiny() -> KdfConfig {
    KdfConfig {
        n: 16,
        r: 1,
        p: 1,
        dklen: 32,
    }
}

fn keypair_from_seed(seed: [u8; 32]) -> Option<Secp256k1KeyPair> {
    Secp256k1SecretKey::from_bytes(&seed)
        .ok()
        .map(Secp256k1KeyPair::from_secret_key)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))] // scrypt per case

    /// Property: the right password always recovers the key
    #[test]
    fn prop_keystore_roundtrip(seed in any::<[u8; 32]>(), password in "\\PC{0,24}") {
        let keypair = keypair_from_seed(seed);
        prop_assume!(keypair.is_some());
        let keypair = keypair.unwrap();

        let record = KeystoreRecord::encrypt(&keypair, &password, &tiny()).unwrap();
        let json = record.to_json().unwrap();
        let decrypted = KeystoreRecord::from_json(&json).unwrap().decrypt(&password).unwrap();

        prop_assert_eq!(*decrypted.secret_key.to_bytes(), *keypair.secret_key.to_bytes());
    }

    /// Property: any other password is rejected as InvalidPassword
    #[test]
    fn prop_keystore_wrong_password(a in "\\PC{0,16}", b in "\\PC{0,16}") {
        prop_assume!(a != b);
        let keypair = Secp256k1KeyPair::generate(&mut rand::thread_rng());

        let record = KeystoreRecord::encrypt(&keypair, &a, &tiny()).unwrap();
        let err = CryptoError::from(record.decrypt(&b).unwrap_err());
        prop_assert_eq!(err, CryptoError::InvalidPassword);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: signatures recover to the signer in both v encodings
    #[test]
    fn prop_sign_recover_agreement(seed in any::<[u8; 32]>(), message in prop::collection::vec(any::<u8>(), 0..256)) {
        let keypair = keypair_from_seed(seed);
        prop_assume!(keypair.is_some());
        let keypair = keypair.unwrap();

        let digest = hash(&message);
        let signature = keypair.sign_digest(&digest).unwrap();
        prop_assert_eq!(recover(&digest, &signature).unwrap(), keypair.address());
        prop_assert!(validate(&message, &signature, &keypair.address()).unwrap());

        let legacy = RecoverableSignature::from_bytes(&signature.to_bytes_with(VEncoding::Legacy)).unwrap();
        prop_assert_eq!(recover(&digest, &legacy).unwrap(), keypair.address());
    }

    /// Property: signing is deterministic
    #[test]
    fn prop_signing_deterministic(seed in any::<[u8; 32]>(), message in prop::collection::vec(any::<u8>(), 0..64)) {
        let keypair = keypair_from_seed(seed);
        prop_assume!(keypair.is_some());
        let keypair = keypair.unwrap();

        let digest = hash(&message);
        prop_assert_eq!(keypair.sign_digest(&digest).unwrap(), keypair.sign_digest(&digest).unwrap());
    }

    /// Property: a changed message never validates against the original signer
    #[test]
    fn prop_altered_message_rejected(message in prop::collection::vec(any::<u8>(), 1..64), index in any::<prop::sample::Index>()) {
        let keypair = Secp256k1KeyPair::generate(&mut rand::thread_rng());
        let signature = keypair.sign_digest(&hash(&message)).unwrap();

        let mut altered = message.clone();
        let i = index.index(altered.len());
        altered[i] ^= 0x01;

        prop_assert!(!validate(&altered, &signature, &keypair.address()).unwrap_or(false));
    }
}
