use std::{num::NonZeroUsize, path::Path};

use asset_tree::Config;
use tracing::instrument;

use super::terminal::Colorize;

const KEYS: &str = "page_size\n  adopt_orphans";

#[derive(Debug, clap::Parser)]
/// Show or modify configuration settings
///
/// Configuration is stored in assets.toml in the data root.
///
/// Available configuration keys:
///   `page_size`      Asset records requested per page (default: 50)
///   `adopt_orphans`  Move parked nodes under parents that arrive later
///                    (default: false)
pub struct Command {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show all configuration values
    Show,

    /// Get a specific configuration value
    Get {
        /// Configuration key to retrieve
        key: String,
    },

    /// Set a configuration value
    ///
    /// Examples:
    ///   assets config set `page_size` 100
    ///   assets config set `adopt_orphans` true
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },
}

impl Command {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(Config::FILE_NAME);

        match self.command {
            ConfigCommand::Show => {
                let config = load(&config_path)?;
                println!("Configuration:");
                println!("  page_size: {}", config.page_size());
                println!(
                    "  adopt_orphans: {} ({})",
                    config.adopt_orphans,
                    if config.adopt_orphans {
                        "late parents adopt parked nodes".dim()
                    } else {
                        "parked nodes stay under the root".dim()
                    }
                );
                Ok(())
            }
            ConfigCommand::Get { key } => {
                println!("{}", get(&load(&config_path)?, &key)?);
                Ok(())
            }
            ConfigCommand::Set { key, value } => {
                let mut config = load(&config_path)?;
                set(&mut config, &key, &value)?;
                config
                    .save(&config_path)
                    .map_err(|e| anyhow::anyhow!("{e}"))?;
                println!("{}", format!("Set {key} = {value}").success());
                Ok(())
            }
        }
    }
}

fn load(config_path: &Path) -> anyhow::Result<Config> {
    if config_path.exists() {
        Config::load(config_path).map_err(|e| anyhow::anyhow!("{e}"))
    } else {
        Ok(Config::default())
    }
}

fn get(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "page_size" => Ok(config.page_size().to_string()),
        "adopt_orphans" => Ok(config.adopt_orphans.to_string()),
        _ => anyhow::bail!("Unknown configuration key: '{key}'\n\nAvailable keys:\n  {KEYS}"),
    }
}

fn set(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "page_size" => {
            let size = value
                .parse::<NonZeroUsize>()
                .map_err(|_| anyhow::anyhow!("Value must be a positive integer"))?;
            config.set_page_size(size);
        }
        "adopt_orphans" => {
            config.adopt_orphans = value
                .parse::<bool>()
                .map_err(|_| anyhow::anyhow!("Value must be 'true' or 'false'"))?;
        }
        _ => anyhow::bail!("Unknown configuration key: '{key}'\n\nAvailable keys:\n  {KEYS}"),
    }
    Ok(())
}
