//! Shared helpers for the account commands

use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

use crate::client_config::OutputFormat;

/// Minimum length for passphrases chosen at account creation
pub const MIN_PASSPHRASE_LENGTH: usize = 8;

/// Ensure a directory exists with owner-only permissions
pub fn ensure_keystore_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).context("Failed to create keystore directory")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o700);
            fs::set_permissions(dir, perms).context("Failed to set directory permissions")?;
        }
    }
    Ok(())
}

/// Read passphrase from file or prompt interactively
pub fn get_passphrase(
    passphrase_file: Option<&Path>,
    prompt: &str,
    confirm: bool,
) -> Result<SecretString> {
    if let Some(file) = passphrase_file {
        read_passphrase_from_file(file)
    } else {
        prompt_passphrase(prompt, confirm)
    }
}

/// Read passphrase from a file, ignoring surrounding whitespace
pub fn read_passphrase_from_file(path: &Path) -> Result<SecretString> {
    let content = Zeroizing::new(
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read passphrase file: {}", path.display()))?,
    );

    let passphrase = content.trim();
    if passphrase.is_empty() {
        return Err(anyhow!("Passphrase file is empty"));
    }

    Ok(SecretString::from(passphrase))
}

/// Prompt for passphrase with optional confirmation
pub fn prompt_passphrase(prompt: &str, confirm: bool) -> Result<SecretString> {
    let passphrase =
        Zeroizing::new(rpassword::prompt_password(prompt).context("Failed to read passphrase")?);

    if confirm {
        let confirmation = Zeroizing::new(
            rpassword::prompt_password("Confirm passphrase: ")
                .context("Failed to read passphrase confirmation")?,
        );

        if *passphrase != *confirmation {
            return Err(anyhow!("Passphrases do not match"));
        }
    }

    Ok(SecretString::from(passphrase.as_str()))
}

/// Reject passphrases too short to protect a new account
pub fn check_new_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.chars().count() < MIN_PASSPHRASE_LENGTH {
        return Err(anyhow!(
            "Passphrase must be at least {} characters",
            MIN_PASSPHRASE_LENGTH
        ));
    }
    Ok(())
}

/// Message bytes from `--message` or `--message-file`
pub fn read_message(message: Option<String>, message_file: Option<PathBuf>) -> Result<Vec<u8>> {
    match (message, message_file) {
        (Some(text), None) => Ok(text.into_bytes()),
        (None, Some(path)) => fs::read(&path)
            .with_context(|| format!("Failed to read message file: {}", path.display())),
        _ => Err(anyhow!("Exactly one of --message or --message-file is required")),
    }
}

/// Keystore file name for an address: lower-case hex, no prefix
pub fn keystore_file_name(address: &str) -> String {
    format!("{}.json", address.trim_start_matches("0x").to_lowercase())
}

/// Print `value` as pretty JSON, or `text` otherwise
pub fn print_output<T: Serialize>(format: OutputFormat, value: &T, text: &str) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => println!("{}", text),
    }
    Ok(())
}
