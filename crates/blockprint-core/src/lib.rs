//! Blockprint Core - perceptual fingerprints for PNG and JPEG images.
//!
//! Turns an image reference (an in-memory buffer, a local path or a remote
//! URL) into a block-hash fingerprint. The content is trusted only after its
//! sniffed MIME type agrees with the file extension, when one is present.
//!
//! # Architecture
//!
//! ```text
//! Source → Resolve → Sniff → Validate → Decode (PNG | JPEG) → Hash
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use blockprint_core::{compute_image_hash, HashMethod, ImageSource};
//!
//! #[tokio::main]
//! async fn main() -> blockprint_core::Result<()> {
//!     let source = ImageSource::reference("./photo.png");
//!     let fingerprint = compute_image_hash(Some(source), 16, HashMethod::Precise).await?;
//!     println!("{fingerprint}");
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenient access
pub use config::Config;
pub use error::{BlockprintError, ConfigError, PipelineError, PipelineResult, Result};
pub use pipeline::FingerprintPipeline;
pub use types::{
    Fingerprint, HashMethod, HashRequest, ImageKind, ImageSource, NameHint, RoutingDecision,
    SniffedType,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compute a fingerprint with the default pipeline and the user's config file.
///
/// `None` as the source fails with `SourceMissing` without touching the disk
/// or the network.
pub async fn compute_image_hash(
    source: Option<ImageSource>,
    bits: u32,
    method: HashMethod,
) -> Result<Fingerprint> {
    compute_with_config(source, HashRequest::new(bits, method), Config::load).await
}

/// Checks the source before `load_config` runs, so a missing source never
/// reads the config file or builds an HTTP client.
async fn compute_with_config<F>(
    source: Option<ImageSource>,
    request: HashRequest,
    load_config: F,
) -> Result<Fingerprint>
where
    F: FnOnce() -> std::result::Result<Config, ConfigError>,
{
    let Some(source) = source else {
        return Err(PipelineError::SourceMissing.into());
    };
    let blockprint = Blockprint::new(load_config()?)?;
    blockprint.hash(Some(source), request).await
}

/// Blockprint facade - the main entry point for fingerprinting.
pub struct Blockprint {
    config: Config,
    pipeline: FingerprintPipeline,
}

impl Blockprint {
    /// Create a new Blockprint instance with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        tracing::debug!("Initializing Blockprint v{}", VERSION);
        let pipeline = FingerprintPipeline::new(&config)?;
        Ok(Self { config, pipeline })
    }

    /// Create a new Blockprint instance from the config file, or defaults.
    pub fn with_defaults() -> Result<Self> {
        let config = Config::load()?;
        Self::new(config)
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying pipeline.
    pub fn pipeline(&self) -> &FingerprintPipeline {
        &self.pipeline
    }

    /// Fingerprint one source with explicit parameters.
    pub async fn hash(
        &self,
        source: Option<ImageSource>,
        request: HashRequest,
    ) -> Result<Fingerprint> {
        Ok(self.pipeline.compute_image_hash(source, request).await?)
    }

    /// Fingerprint one source with the configured default parameters.
    pub async fn hash_with_defaults(&self, source: Option<ImageSource>) -> Result<Fingerprint> {
        self.hash(source, self.config.hashing.request()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::png_bytes;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[tokio::test]
    async fn test_blockprint_new() {
        let blockprint = Blockprint::new(Config::default()).unwrap();
        assert_eq!(blockprint.config().hashing.bits, 16);
    }

    #[tokio::test]
    async fn test_hash_with_defaults_uses_config() {
        let mut config = Config::default();
        config.hashing.bits = 8;
        let blockprint = Blockprint::new(config).unwrap();

        let fingerprint = blockprint
            .hash_with_defaults(Some(ImageSource::named_buffer(png_bytes(32, 32), "a.png")))
            .await
            .unwrap();
        assert_eq!(fingerprint.as_str().len(), 16);
    }

    #[tokio::test]
    async fn test_missing_source_skips_config_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[hashing\n").unwrap();
        let loads = std::cell::Cell::new(0);

        let err = compute_with_config(None, HashRequest::new(16, HashMethod::Precise), || {
            loads.set(loads.get() + 1);
            Config::load_from(&path)
        })
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            BlockprintError::Pipeline(PipelineError::SourceMissing)
        ));
        assert_eq!(loads.get(), 0);
    }

    #[tokio::test]
    async fn test_malformed_config_surfaces_when_source_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[hashing\n").unwrap();

        let err = compute_with_config(
            Some(ImageSource::named_buffer(png_bytes(16, 16), "a.png")),
            HashRequest::new(16, HashMethod::Precise),
            || Config::load_from(&path),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            BlockprintError::Config(ConfigError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_compute_image_hash_without_source() {
        let err = compute_image_hash(None, 16, HashMethod::Precise)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BlockprintError::Pipeline(PipelineError::SourceMissing)
        ));
    }
}
