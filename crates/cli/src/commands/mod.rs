//! Command implementations for the `ecsign` CLI
//!
//! - `account create`: new key, written as a V3 keystore file
//! - `account address`: address of a keystore, no passphrase needed
//! - `account list`: keystores in the keystore directory
//! - `sign`: sign a message with a keystore
//! - `verify`: check a signature against an address
//! - `config init` / `config show`: manage `client.toml`
//!
//! Passphrases are read from `--passphrase-file` or from the terminal
//! without echo. They never appear in logs or output.

pub mod account;
pub mod common;
pub mod config;
pub mod sign;
pub mod verify;

use anyhow::Result;
use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::client_config::{ClientConfig, OutputFormat};

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommand {
    /// Create a new account
    ///
    /// Generates a fresh secp256k1 key and stores it as a V3 keystore
    /// encrypted with a passphrase. Prints the account address.
    Create {
        /// Read passphrase from file instead of prompting
        #[arg(long)]
        passphrase_file: Option<PathBuf>,

        /// Directory for the keystore file (overrides client.toml)
        #[arg(long)]
        keystore_dir: Option<PathBuf>,
    },

    /// Print the address of a keystore file
    ///
    /// Reads only public information; no passphrase is required.
    Address {
        /// Path to the keystore file
        keystore: PathBuf,
    },

    /// List all keystores in the keystore directory
    List {
        /// Directory containing keystore files (overrides client.toml)
        #[arg(long)]
        keystore_dir: Option<PathBuf>,
    },
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Write a default client.toml
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,

        /// Use reduced scrypt cost for new keystores (N=4096, p=6)
        #[arg(long)]
        light: bool,
    },

    /// Show the effective configuration
    Show,
}

/// Execute an account command
pub async fn execute_account_command(
    home: &Path,
    config: &ClientConfig,
    output: OutputFormat,
    command: AccountCommand,
) -> Result<()> {
    match command {
        AccountCommand::Create {
            passphrase_file,
            keystore_dir,
        } => {
            let dir = keystore_dir.unwrap_or_else(|| config.effective_keystore_dir(home));
            account::create(config, output, &dir, passphrase_file).await
        }

        AccountCommand::Address { keystore } => account::address(output, &keystore),

        AccountCommand::List { keystore_dir } => {
            let dir = keystore_dir.unwrap_or_else(|| config.effective_keystore_dir(home));
            account::list(output, &dir)
        }
    }
}

/// Execute a config command
pub fn execute_config_command(
    home: &Path,
    output: Option<OutputFormat>,
    command: ConfigCommand,
) -> Result<()> {
    match command {
        ConfigCommand::Init { force, light } => config::init(home, force, light),
        ConfigCommand::Show => config::show(home, output),
    }
}
