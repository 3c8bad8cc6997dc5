//! Message digests.
//!
//! Messages are hashed with SHA-256 before signing. Address derivation and
//! the keystore MAC use keccak256, re-exported here for convenience.

use std::fmt;

use sha2::{Digest as _, Sha256};

pub use alloy_primitives::keccak256;

/// Digest length in bytes
pub const DIGEST_LENGTH: usize = 32;

/// A 32-byte message digest
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LENGTH]);

impl Digest {
    pub const fn from_bytes(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }

    /// `0x`-prefixed lower-case hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// SHA-256 of an arbitrary message. Accepts empty input; never fails.
pub fn hash(message: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(message);
    Digest(hasher.finalize().into())
}
