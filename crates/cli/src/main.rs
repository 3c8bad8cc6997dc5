//! ecsign CLI
//!
//! Create password-protected accounts, sign messages and verify signatures.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ecsign::commands::{execute_account_command, execute_config_command, sign, verify};
use ecsign::{
    AccountCommand, ClientConfig, ConfigCommand, OutputFormat, DEFAULT_HOME_DIR, ECSIGN_HOME_ENV,
    EXIT_INVALID_SIGNATURE,
};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// ecsign
#[derive(Parser)]
#[command(name = "ecsign")]
#[command(author = "ecsign Contributors")]
#[command(version)]
#[command(about = "Password-protected secp256k1 accounts and message signatures", long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Directory for config and keystores
    #[arg(long, global = true, default_value_os_t = default_home_dir())]
    home: PathBuf,

    /// Output format (overrides client.toml)
    #[arg(long, global = true, value_enum)]
    output: Option<OutputFormat>,

    /// The logging level (trace|debug|info|warn|error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// The logging format (json|plain)
    #[arg(long, global = true, default_value = "plain")]
    log_format: String,

    /// Disable colored logs
    #[arg(long, global = true, default_value = "false")]
    log_no_color: bool,

    /// Print out the full error chain on errors
    #[arg(long, global = true, default_value = "false")]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage accounts and their keystores
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },

    /// Sign a message with a keystore
    Sign {
        /// Path to the keystore file
        #[arg(long)]
        keystore: PathBuf,

        /// Message to sign, as UTF-8 text
        #[arg(long, conflicts_with = "message_file", required_unless_present = "message_file")]
        message: Option<String>,

        /// Read the message bytes from a file
        #[arg(long)]
        message_file: Option<PathBuf>,

        /// Read passphrase from file instead of prompting
        #[arg(long)]
        passphrase_file: Option<PathBuf>,
    },

    /// Verify a signature against an address (exit code 1 if it does not match)
    Verify {
        /// Signature as 65-byte hex (0x prefix optional)
        #[arg(long)]
        signature: String,

        /// Expected signer address (0x prefix optional, case-insensitive)
        #[arg(long)]
        address: String,

        /// Signed message, as UTF-8 text
        #[arg(long, conflicts_with = "message_file", required_unless_present = "message_file")]
        message: Option<String>,

        /// Read the message bytes from a file
        #[arg(long)]
        message_file: Option<PathBuf>,
    },

    /// Utilities for managing client configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Returns the default home directory for ecsign.
///
/// Resolution order:
/// 1. `ECSIGN_HOME` environment variable (if set)
/// 2. `~/.ecsign` (default)
fn default_home_dir() -> PathBuf {
    if let Ok(home) = std::env::var(ECSIGN_HOME_ENV) {
        return PathBuf::from(home);
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_HOME_DIR)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, &cli.log_format, cli.log_no_color);

    let result = run(&cli.home, cli.output, cli.command).await;

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_INVALID_SIGNATURE),
        Err(e) => {
            if cli.trace {
                eprintln!("Error: {:?}", e);
            } else {
                eprintln!("Error: {:#}", e);
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Dispatch a command; `Ok(false)` means a signature did not verify.
async fn run(home: &Path, output: Option<OutputFormat>, command: Commands) -> Result<bool> {
    match command {
        Commands::Account { command } => {
            let (config, output) = load_config(home, output)?;
            execute_account_command(home, &config, output, command).await?;
            Ok(true)
        }

        Commands::Sign {
            keystore,
            message,
            message_file,
            passphrase_file,
        } => {
            let (config, output) = load_config(home, output)?;
            sign::execute(
                &config,
                output,
                &keystore,
                message,
                message_file,
                passphrase_file,
            )
            .await?;
            Ok(true)
        }

        Commands::Verify {
            signature,
            address,
            message,
            message_file,
        } => {
            let (config, output) = load_config(home, output)?;
            verify::execute(&config, output, signature, address, message, message_file).await
        }

        Commands::Config { command } => {
            execute_config_command(home, output, command)?;
            Ok(true)
        }
    }
}

/// Client configuration and the output format after applying `--output`
fn load_config(home: &Path, output: Option<OutputFormat>) -> Result<(ClientConfig, OutputFormat)> {
    let config = ClientConfig::load(home)?;
    let output = output.unwrap_or(config.output);
    Ok((config, output))
}

fn init_tracing(log_level: &str, log_format: &str, no_color: bool) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr);

    match log_format {
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}
