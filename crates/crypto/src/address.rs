//! Address parsing and formatting.
//!
//! Addresses are compared as 20 raw bytes, so the case of the hex input never
//! matters and EIP-55 checksums are neither required nor enforced.

use alloy_primitives::Address;

use crate::error::{CryptoError, CryptoResult};

/// Address length in bytes
pub const ADDRESS_LENGTH: usize = 20;

/// Parse a hex address, with or without `0x` prefix, in any case.
pub fn parse_address(input: &str) -> CryptoResult<Address> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.len() != ADDRESS_LENGTH * 2 {
        return Err(CryptoError::InvalidAddress(format!(
            "expected 40 hex digits, got {}",
            digits.len()
        )));
    }

    let bytes = hex::decode(digits).map_err(|e| CryptoError::InvalidAddress(e.to_string()))?;
    Ok(Address::from_slice(&bytes))
}

/// Lower-case hex without prefix, as stored in a keystore's `address` field
pub fn to_unprefixed_hex(address: &Address) -> String {
    hex::encode(address)
}

/// Lower-case `0x`-prefixed hex, the transport form
pub fn to_prefixed_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}
