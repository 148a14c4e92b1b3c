//! Error types for the Blockprint fingerprinting pipeline.
//!
//! Errors are organized by stage. Every stage fails closed: the first error
//! ends the invocation and is returned to the caller unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Blockprint operations.
#[derive(Error, Debug)]
pub enum BlockprintError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// The HTTP client for remote sources could not be built
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Pipeline errors, one variant per failure kind.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No source was supplied
    #[error("No image source provided")]
    SourceMissing,

    /// Reading a local file failed
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Retrieving a remote resource failed
    #[error("Failed to fetch {url}: {message}")]
    FetchFailure {
        url: String,
        message: String,
        status_code: Option<u16>,
    },

    /// Content sniffing found no usable MIME type
    #[error("Mime type not found")]
    MimeUndetected,

    /// The name carries an extension that disagrees with the content
    #[error("Unrecognized file extension, mime type or mismatch, ext: {ext} / mime: {mime}")]
    ExtensionMismatch { ext: String, mime: String },

    /// No extension, and the content is not a supported image type
    #[error("Unrecognized mime type: {mime}")]
    UnsupportedMime { mime: String },

    /// The decoder or the hasher could not derive a fingerprint
    #[error("Failed to {stage} image: {message}")]
    DecodeFailure { stage: String, message: String },
}

impl PipelineError {
    /// Name of the pipeline stage that produced this error.
    pub fn stage(&self) -> &str {
        match self {
            Self::SourceMissing | Self::ReadFailure { .. } | Self::FetchFailure { .. } => {
                "resolve"
            }
            Self::MimeUndetected => "sniff",
            Self::ExtensionMismatch { .. } | Self::UnsupportedMime { .. } => "validate",
            Self::DecodeFailure { stage, .. } => stage.as_str(),
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::DecodeFailure {
            stage: "decode".to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn hash(message: impl Into<String>) -> Self {
        Self::DecodeFailure {
            stage: "hash".to_string(),
            message: message.into(),
        }
    }
}

/// Convenience type alias for Blockprint results.
pub type Result<T> = std::result::Result<T, BlockprintError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
