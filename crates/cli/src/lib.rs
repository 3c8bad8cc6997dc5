//! ecsign command line tool
//!
//! Library half of the `ecsign` binary: client configuration and the
//! command implementations. `main.rs` only parses arguments, sets up
//! logging and dispatches here.

pub mod client_config;
pub mod commands;

pub use client_config::{ClientConfig, OutputFormat};
pub use commands::{AccountCommand, ConfigCommand};

/// Environment variable overriding the home directory
pub const ECSIGN_HOME_ENV: &str = "ECSIGN_HOME";

/// Home directory name under the user's home
pub const DEFAULT_HOME_DIR: &str = ".ecsign";

/// Exit code of `verify` when the signature does not match
pub const EXIT_INVALID_SIGNATURE: i32 = 1;
