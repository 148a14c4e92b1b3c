//! Blockprint CLI - perceptual block-hash fingerprints for PNG and JPEG images.
//!
//! # Usage
//!
//! ```bash
//! # Fingerprint a local file
//! blockprint hash photo.png
//!
//! # Fingerprint a remote image with a coarser grid
//! blockprint hash https://example.com/photo.jpg --bits 8 --method quick
//!
//! # Fingerprint bytes piped on stdin, naming them for extension checks
//! cat photo.png | blockprint hash --stdin --name photo.png
//!
//! # View configuration
//! blockprint config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Blockprint - perceptual block-hash fingerprints for PNG and JPEG images.
#[derive(Parser, Debug)]
#[command(name = "blockprint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the fingerprint of an image
    Hash(cli::hash::HashArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match blockprint_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `blockprint config path`."
            );
            blockprint_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Blockprint v{}", blockprint_core::VERSION);

    match cli.command {
        Commands::Hash(args) => cli::hash::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args),
    }
}
