//! Message signing

use anyhow::{Context, Result};
use ecsign_account::AccountService;
use ecsign_crypto::hash;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::common::{get_passphrase, print_output, read_message};
use crate::client_config::{ClientConfig, OutputFormat};

#[derive(Debug, Serialize)]
struct SignOutput {
    digest: String,
    signature: String,
}

/// Sign a message with the key in `keystore`
pub async fn execute(
    config: &ClientConfig,
    output: OutputFormat,
    keystore: &Path,
    message: Option<String>,
    message_file: Option<PathBuf>,
    passphrase_file: Option<PathBuf>,
) -> Result<()> {
    let message = read_message(message, message_file)?;
    let record = fs::read_to_string(keystore)
        .with_context(|| format!("Failed to read keystore: {}", keystore.display()))?;

    let passphrase = get_passphrase(passphrase_file.as_deref(), "Enter passphrase: ", false)?;

    debug!(keystore = %keystore.display(), len = message.len(), "Signing message");
    let digest = hash(&message);

    let service = AccountService::new(config.account_config());
    let signature = service
        .sign_message_async(message, record, passphrase)
        .await
        .context("Failed to sign message")?;

    let result = SignOutput {
        digest: digest.to_hex(),
        signature,
    };
    print_output(output, &result, &result.signature)
}
