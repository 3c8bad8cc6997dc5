//! Account service configuration

use ecsign_crypto::{CryptoError, CryptoResult, KdfConfig};
use serde::{Deserialize, Serialize};

/// Settings applied to newly created accounts.
///
/// Only the cost of new keystores is configurable. Existing records are
/// always decrypted with the parameters they embed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct AccountConfig {
    /// scrypt parameters for new keystores
    #[serde(default)]
    pub kdf: KdfConfig,
}

impl AccountConfig {
    pub fn new(kdf: KdfConfig) -> Self {
        Self { kdf }
    }

    /// Reduced scrypt cost (N=4096, p=6)
    pub fn light() -> Self {
        Self::new(KdfConfig::light())
    }

    pub fn validate(&self) -> CryptoResult<()> {
        self.kdf
            .validate()
            .map_err(|e| CryptoError::InvalidConfig(e.to_string()))
    }
}
