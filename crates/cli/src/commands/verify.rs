//! Signature verification

use anyhow::{Context, Result};
use ecsign_account::AccountService;
use serde::Serialize;
use std::path::PathBuf;

use super::common::{print_output, read_message};
use crate::client_config::{ClientConfig, OutputFormat};

#[derive(Debug, Serialize)]
struct VerifyOutput {
    address: String,
    valid: bool,
}

/// Check `signature` over the message against `address`.
///
/// Returns whether the signature matches; malformed input is an error.
pub async fn execute(
    config: &ClientConfig,
    output: OutputFormat,
    signature: String,
    address: String,
    message: Option<String>,
    message_file: Option<PathBuf>,
) -> Result<bool> {
    let message = read_message(message, message_file)?;

    let service = AccountService::new(config.account_config());
    let valid = service
        .validate_signature_async(message, signature, address.clone())
        .await
        .context("Failed to verify signature")?;

    let result = VerifyOutput { address, valid };
    let text = if valid { "valid" } else { "invalid" };
    print_output(output, &result, text)?;

    Ok(valid)
}
