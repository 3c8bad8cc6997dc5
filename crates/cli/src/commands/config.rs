//! client.toml management

use anyhow::{anyhow, Context, Result};
use ecsign_crypto::KdfConfig;

use crate::client_config::{ClientConfig, OutputFormat};
use std::path::Path;

/// Write a default client.toml under `home`
pub fn init(home: &Path, force: bool, light: bool) -> Result<()> {
    let path = ClientConfig::config_path(home);
    if path.exists() && !force {
        return Err(anyhow!(
            "Configuration already exists at {}. Use --force to overwrite.",
            path.display()
        ));
    }

    let config = ClientConfig {
        kdf: if light {
            KdfConfig::light()
        } else {
            KdfConfig::standard()
        },
        ..Default::default()
    };
    config.save(home)?;

    println!("Wrote {}", path.display());
    Ok(())
}

/// Print the effective configuration: the file merged with defaults
pub fn show(home: &Path, output: Option<OutputFormat>) -> Result<()> {
    let config = ClientConfig::load(home)?;

    match output.unwrap_or(config.output) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => {
            let content =
                toml::to_string_pretty(&config).context("Failed to serialize client config")?;
            println!("# {}", ClientConfig::config_path(home).display());
            print!("{}", content);
        }
    }
    Ok(())
}
