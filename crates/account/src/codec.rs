//! Non-blocking forms of the digest and keystore codec
//!
//! Each function runs its synchronous counterpart from `ecsign-crypto` on
//! tokio's blocking pool and resolves with the same value or error kind.

use ecsign_crypto::{
    hash, CryptoError, CryptoResult, Digest, KdfConfig, KeystoreRecord, Secp256k1KeyPair,
};
use secrecy::{ExposeSecret, SecretString};

use crate::offload::run_blocking;

/// [`hash`] on the blocking pool.
pub async fn hash_async(message: Vec<u8>) -> CryptoResult<Digest> {
    run_blocking(move || Ok(hash(&message))).await
}

/// [`KeystoreRecord::encrypt`] on the blocking pool.
///
/// Out-of-range cost parameters fail with `InvalidConfig`.
pub async fn encrypt_record_async(
    keypair: Secp256k1KeyPair,
    password: SecretString,
    config: KdfConfig,
) -> CryptoResult<KeystoreRecord> {
    config
        .validate()
        .map_err(|e| CryptoError::InvalidConfig(e.to_string()))?;

    run_blocking(move || {
        Ok(KeystoreRecord::encrypt(
            &keypair,
            password.expose_secret(),
            &config,
        )?)
    })
    .await
}

/// [`KeystoreRecord::decrypt`] on the blocking pool.
pub async fn decrypt_record_async(
    record: KeystoreRecord,
    password: SecretString,
) -> CryptoResult<Secp256k1KeyPair> {
    run_blocking(move || Ok(record.decrypt(password.expose_secret())?)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecsign_crypto::IntoSecret;

    fn fast() -> KdfConfig {
        KdfConfig {
            n: 1024,
            r: 8,
            p: 1,
            dklen: 32,
        }
    }

    #[tokio::test]
    async fn test_hash_async_matches_hash() {
        for message in [&b""[..], &b"bla"[..], &[0xffu8; 1000][..]] {
            assert_eq!(hash_async(message.to_vec()).await.unwrap(), hash(message));
        }
    }

    #[tokio::test]
    async fn test_encrypt_then_decrypt_async() {
        let keypair = Secp256k1KeyPair::generate(&mut rand::thread_rng());

        let record = encrypt_record_async(keypair.clone(), "gft".into_secret(), fast())
            .await
            .unwrap();
        assert_eq!(record.address().unwrap(), keypair.address());

        let sync = record.decrypt("gft").unwrap();
        let decrypted = decrypt_record_async(record, "gft".into_secret())
            .await
            .unwrap();
        assert_eq!(decrypted.public_key, keypair.public_key);
        assert_eq!(decrypted.public_key, sync.public_key);
    }

    #[tokio::test]
    async fn test_decrypt_async_error_kinds_match_sync() {
        let keypair = Secp256k1KeyPair::generate(&mut rand::thread_rng());
        let record = KeystoreRecord::encrypt(&keypair, "gft", &fast()).unwrap();

        let sync = CryptoError::from(record.decrypt("gfu").unwrap_err());
        let result = decrypt_record_async(record.clone(), "gfu".into_secret()).await;
        assert_eq!(result.unwrap_err(), sync);
        assert_eq!(sync, CryptoError::InvalidPassword);

        let mut unsupported = record;
        unsupported.crypto.cipher = "aes-128-cbc".to_string();
        let result = decrypt_record_async(unsupported, "gft".into_secret()).await;
        assert!(matches!(result, Err(CryptoError::MalformedRecord(_))));
    }

    #[tokio::test]
    async fn test_encrypt_async_rejects_bad_config() {
        let keypair = Secp256k1KeyPair::generate(&mut rand::thread_rng());
        let config = KdfConfig { n: 1000, ..fast() };

        let result = encrypt_record_async(keypair, "gft".into_secret(), config).await;
        assert!(matches!(result, Err(CryptoError::InvalidConfig(_))));
    }
}
