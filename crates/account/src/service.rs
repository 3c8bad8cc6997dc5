//! Account operations over V3 keystore records

use ecsign_crypto::{
    hash, parse_address, to_prefixed_hex, validate, CryptoResult, Digest, KeystoreRecord,
    RecoverableSignature, Secp256k1KeyPair,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::codec::hash_async;
use crate::config::AccountConfig;
use crate::offload::run_blocking;

/// Creates accounts, signs messages and validates signatures.
///
/// Stateless apart from its configuration: no decrypted key, derived key or
/// digest outlives the call that produced it, so one service may be shared
/// freely between tasks.
#[derive(Debug, Clone, Default)]
pub struct AccountService {
    config: AccountConfig,
}

impl AccountService {
    pub fn new(config: AccountConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AccountConfig {
        &self.config
    }

    /// Generate a fresh key and return it as a V3 keystore JSON record
    /// encrypted under `password`.
    pub fn create_account(&self, password: &SecretString) -> CryptoResult<String> {
        create_record(&self.config, password)
    }

    /// Sign `message` with the key held in `record`.
    ///
    /// Returns the 65-byte signature as `0x`-prefixed hex with `v` in {0, 1}.
    /// A wrong password and a tampered record both fail with
    /// `InvalidPassword`.
    pub fn sign_message(
        &self,
        message: &[u8],
        record: &str,
        password: &SecretString,
    ) -> CryptoResult<String> {
        let digest = hash(message);
        let keypair = decrypt_record(record, password)?;
        sign_with(&keypair, &digest)
    }

    /// Check that `signature` over `message` was made by `expected_address`.
    ///
    /// The address comparison ignores case. A signature from a different key
    /// is `Ok(false)`; a malformed signature or address is an error.
    pub fn validate_signature(
        &self,
        message: &[u8],
        signature: &str,
        expected_address: &str,
    ) -> CryptoResult<bool> {
        let expected = parse_address(expected_address)?;
        let signature = RecoverableSignature::from_hex(signature)?;

        let valid = validate(message, &signature, &expected)?;
        debug!(
            address = %to_prefixed_hex(&expected),
            valid,
            "Validated signature"
        );
        Ok(valid)
    }

    /// [`create_account`](Self::create_account) on the blocking pool.
    pub async fn create_account_async(&self, password: SecretString) -> CryptoResult<String> {
        let config = self.config;
        run_blocking(move || create_record(&config, &password)).await
    }

    /// [`sign_message`](Self::sign_message) on the blocking pool.
    ///
    /// Hashing and keystore decryption run as two concurrent blocking tasks;
    /// the first failure is returned.
    pub async fn sign_message_async(
        &self,
        message: Vec<u8>,
        record: String,
        password: SecretString,
    ) -> CryptoResult<String> {
        let (digest, keypair) = tokio::try_join!(
            hash_async(message),
            run_blocking(move || decrypt_record(&record, &password))
        )?;
        sign_with(&keypair, &digest)
    }

    /// [`validate_signature`](Self::validate_signature) on the blocking pool.
    pub async fn validate_signature_async(
        &self,
        message: Vec<u8>,
        signature: String,
        expected_address: String,
    ) -> CryptoResult<bool> {
        let service = self.clone();
        run_blocking(move || service.validate_signature(&message, &signature, &expected_address))
            .await
    }
}

fn create_record(config: &AccountConfig, password: &SecretString) -> CryptoResult<String> {
    config.validate()?;

    let keypair = Secp256k1KeyPair::generate(&mut rand::thread_rng());
    let record = KeystoreRecord::encrypt(&keypair, password.expose_secret(), &config.kdf)?;

    info!(
        address = %to_prefixed_hex(&keypair.address()),
        id = %record.id(),
        "Created account"
    );
    Ok(record.to_json()?)
}

fn decrypt_record(record: &str, password: &SecretString) -> CryptoResult<Secp256k1KeyPair> {
    let record = KeystoreRecord::from_json(record)?;

    match record.decrypt(password.expose_secret()) {
        Ok(keypair) => {
            debug!(address = %to_prefixed_hex(&keypair.address()), "Decrypted keystore");
            Ok(keypair)
        }
        Err(e) => {
            warn!(id = %record.id(), error = %e, "Keystore decryption failed");
            Err(e.into())
        }
    }
}

fn sign_with(keypair: &Secp256k1KeyPair, digest: &Digest) -> CryptoResult<String> {
    let signature = keypair.sign_digest(digest)?;
    debug!(
        address = %to_prefixed_hex(&keypair.address()),
        digest = %digest,
        "Signed message"
    );
    Ok(signature.to_hex())
}
