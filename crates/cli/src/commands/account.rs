//! Account creation and inspection

use anyhow::{anyhow, Context, Result};
use ecsign_account::AccountService;
use ecsign_crypto::{to_prefixed_hex, KeystoreRecord};
use secrecy::ExposeSecret;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::common::{
    check_new_passphrase, ensure_keystore_dir, get_passphrase, keystore_file_name, print_output,
};
use crate::client_config::{ClientConfig, OutputFormat};

#[derive(Debug, Serialize)]
struct AccountInfo {
    address: String,
    keystore: PathBuf,
}

/// Create a new account and write its keystore into `keystore_dir`
pub async fn create(
    config: &ClientConfig,
    output: OutputFormat,
    keystore_dir: &Path,
    passphrase_file: Option<PathBuf>,
) -> Result<()> {
    let passphrase = get_passphrase(
        passphrase_file.as_deref(),
        "Enter passphrase for the new account: ",
        passphrase_file.is_none(), // Only confirm if prompting
    )?;
    check_new_passphrase(passphrase.expose_secret())?;

    let service = AccountService::new(config.account_config());
    let json = service
        .create_account_async(passphrase)
        .await
        .context("Failed to create account")?;

    let record = KeystoreRecord::from_json(&json).context("Failed to parse new keystore")?;
    let address = record.address().context("New keystore has no address")?;

    ensure_keystore_dir(keystore_dir)?;
    let path = keystore_dir.join(keystore_file_name(&to_prefixed_hex(&address)));
    if path.exists() {
        return Err(anyhow!("Keystore already exists: {}", path.display()));
    }
    record
        .save(&path)
        .with_context(|| format!("Failed to write keystore: {}", path.display()))?;

    info!(address = %to_prefixed_hex(&address), path = %path.display(), "Saved keystore");

    let info = AccountInfo {
        address: to_prefixed_hex(&address),
        keystore: path,
    };
    let text = format!("Address:  {}\nKeystore: {}", info.address, info.keystore.display());
    print_output(output, &info, &text)
}

/// Print the address stored in a keystore file
pub fn address(output: OutputFormat, keystore: &Path) -> Result<()> {
    let record = load_record(keystore)?;
    let address = record
        .address()
        .with_context(|| format!("No address in {}", keystore.display()))?;

    let info = AccountInfo {
        address: to_prefixed_hex(&address),
        keystore: keystore.to_path_buf(),
    };
    print_output(output, &info, &info.address)
}

/// List keystores found in `keystore_dir`
pub fn list(output: OutputFormat, keystore_dir: &Path) -> Result<()> {
    let mut accounts = Vec::new();

    if keystore_dir.exists() {
        for entry in fs::read_dir(keystore_dir)
            .with_context(|| format!("Failed to read {}", keystore_dir.display()))?
        {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }

            match KeystoreRecord::load(&path).map(|record| record.address()) {
                Ok(Ok(address)) => accounts.push(AccountInfo {
                    address: to_prefixed_hex(&address),
                    keystore: path,
                }),
                _ => debug!(path = %path.display(), "Skipping file that is not a keystore"),
            }
        }
    }

    accounts.sort_by(|a, b| a.address.cmp(&b.address));

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&accounts)?),
        OutputFormat::Text if accounts.is_empty() => {
            println!("No keystores found in {}", keystore_dir.display());
            println!();
            println!("Run 'ecsign account create' to create an account.");
        }
        OutputFormat::Text => {
            println!("Keystores in {}", keystore_dir.display());
            println!();
            for account in &accounts {
                println!("  {}  {}", account.address, account.keystore.display());
            }
        }
    }

    Ok(())
}

pub(crate) fn load_record(path: &Path) -> Result<KeystoreRecord> {
    KeystoreRecord::load(path).with_context(|| format!("Failed to load keystore: {}", path.display()))
}
