//! The `blockprint config` command.

use std::path::{Path, PathBuf};

use anyhow::Context;
use blockprint_core::Config;
use clap::{Args, Subcommand};

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show {
        /// Read this file instead of the default location
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Print the default config file path
    Path,

    /// Write a config file with default hashing and fetch settings
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { file } => {
            let config = match file {
                Some(path) => Config::load_from(&path)
                    .with_context(|| format!("Invalid config file {}", path.display()))?,
                None => Config::load()?,
            };
            println!("{}", config.to_toml()?);
        }
        ConfigCommand::Path => println!("{}", Config::default_path().display()),
        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            write_defaults(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn write_defaults(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}
