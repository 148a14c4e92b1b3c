//! The `blockprint hash` command for fingerprinting one image.

use std::io::Read;

use anyhow::Context;
use blockprint_core::{Blockprint, Config, HashMethod, HashRequest, ImageSource};
use clap::{Args, ValueEnum};
use serde::Serialize;

/// Arguments for the `hash` command.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Image path or http(s) URL
    #[arg(required_unless_present = "stdin", conflicts_with = "stdin")]
    pub source: Option<String>,

    /// Read the image bytes from stdin instead
    #[arg(long)]
    pub stdin: bool,

    /// File name to validate stdin bytes against (e.g. "photo.png")
    #[arg(long, requires = "stdin")]
    pub name: Option<String>,

    /// Grid resolution of the hash (defaults to hashing.bits from config)
    #[arg(short, long)]
    pub bits: Option<u32>,

    /// Hashing method (defaults to hashing.method from config)
    #[arg(short, long, value_enum)]
    pub method: Option<Method>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Hashing methods.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Method {
    /// Even blocks over a cropped frame
    Quick,
    /// Fractional blocks over the full frame
    Precise,
}

impl From<Method> for HashMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Quick => HashMethod::Quick,
            Method::Precise => HashMethod::Precise,
        }
    }
}

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// The bare fingerprint
    Text,
    /// A JSON record with the parameters used
    Json,
}

/// One fingerprint with the parameters that produced it.
#[derive(Debug, Serialize)]
struct HashRecord<'a> {
    source: &'a str,
    fingerprint: &'a str,
    bits: u32,
    method: HashMethod,
}

/// Execute the hash command.
pub async fn execute(args: HashArgs, config: Config) -> anyhow::Result<()> {
    let request = resolve_request(&args, &config);
    let (source, label) = read_source(&args)?;

    let blockprint = Blockprint::new(config)?;
    let fingerprint = blockprint
        .hash(Some(source), request)
        .await
        .with_context(|| format!("Failed to fingerprint {label}"))?;

    match args.format {
        OutputFormat::Text => println!("{fingerprint}"),
        OutputFormat::Json => {
            let record = HashRecord {
                source: &label,
                fingerprint: fingerprint.as_str(),
                bits: request.bits,
                method: request.method,
            };
            println!("{}", serde_json::to_string(&record)?);
        }
    }

    Ok(())
}

/// CLI flags take precedence over config defaults.
fn resolve_request(args: &HashArgs, config: &Config) -> HashRequest {
    let defaults = config.hashing.request();
    HashRequest::new(
        args.bits.unwrap_or(defaults.bits),
        args.method.map_or(defaults.method, HashMethod::from),
    )
}

/// Build the image source and a label for messages.
fn read_source(args: &HashArgs) -> anyhow::Result<(ImageSource, String)> {
    if args.stdin {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read image bytes from stdin")?;
        tracing::debug!("Read {} bytes from stdin", bytes.len());
        let label = args.name.clone().unwrap_or_else(|| "<stdin>".to_string());
        let source = ImageSource::Buffer {
            bytes,
            name: args.name.clone(),
        };
        return Ok((source, label));
    }

    let reference = args
        .source
        .clone()
        .context("An image path or URL is required unless --stdin is given")?;
    Ok((ImageSource::reference(reference.as_str()), reference))
}
