//! Pipeline orchestration - wires together all stages.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{ConfigError, PipelineError};
use crate::types::{Fingerprint, HashRequest, ImageSource};

use super::decode::{DecodeDispatcher, ImageDecoder};
use super::diagnostic::{DiagnosticSink, TracingSink};
use super::fetch::{HttpFetcher, RemoteFetcher};
use super::hash::{HashInvoker, PerceptualHasher};
use super::sniff::{MimeSniffer, SignatureSniffer};
use super::source::{FileReader, SourceResolver, TokioFileReader};
use super::validate::Validator;

/// Resolve, sniff, validate, decode and hash one image per call.
///
/// Each call owns its bytes and intermediate values; nothing is shared or
/// cached between calls, so concurrent calls for the same source do
/// independent work.
pub struct FingerprintPipeline {
    resolver: SourceResolver,
    sniffer: Box<dyn MimeSniffer>,
    validator: Validator,
    dispatcher: DecodeDispatcher,
    invoker: HashInvoker,
}

impl FingerprintPipeline {
    /// Create a pipeline with the default collaborators.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Ok(Self {
            resolver: SourceResolver::new(Box::new(TokioFileReader), Box::new(fetcher)),
            sniffer: Box::new(SignatureSniffer),
            validator: Validator::new(Arc::new(TracingSink)),
            dispatcher: DecodeDispatcher::default(),
            invoker: HashInvoker::default(),
        })
    }

    /// Replace the local file reader.
    #[must_use]
    pub fn with_file_reader(mut self, reader: impl FileReader + 'static) -> Self {
        self.resolver.set_reader(Box::new(reader));
        self
    }

    /// Replace the remote fetcher.
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: impl RemoteFetcher + 'static) -> Self {
        self.resolver.set_fetcher(Box::new(fetcher));
        self
    }

    /// Replace the content sniffer.
    #[must_use]
    pub fn with_sniffer(mut self, sniffer: impl MimeSniffer + 'static) -> Self {
        self.sniffer = Box::new(sniffer);
        self
    }

    /// Replace the PNG decoder.
    #[must_use]
    pub fn with_png_decoder(mut self, decoder: impl ImageDecoder + 'static) -> Self {
        self.dispatcher.set_png(Box::new(decoder));
        self
    }

    /// Replace the JPEG decoder.
    #[must_use]
    pub fn with_jpeg_decoder(mut self, decoder: impl ImageDecoder + 'static) -> Self {
        self.dispatcher.set_jpeg(Box::new(decoder));
        self
    }

    /// Replace the perceptual hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: impl PerceptualHasher + 'static) -> Self {
        self.invoker = HashInvoker::new(Box::new(hasher));
        self
    }

    /// Send diagnostic events to `sink` instead of the log.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.validator = Validator::new(sink);
        self
    }

    /// Compute the fingerprint of `source`.
    ///
    /// Suspends only while reading or fetching; decoding and hashing run
    /// inline. Fails with the first stage error.
    pub async fn compute_image_hash(
        &self,
        source: Option<ImageSource>,
        request: HashRequest,
    ) -> Result<Fingerprint, PipelineError> {
        let start = std::time::Instant::now();
        tracing::debug!(
            "Fingerprinting (bits={}, method={})",
            request.bits,
            request.method
        );

        // Resolve
        let resolved = self.resolver.resolve(source).await?;
        tracing::trace!(
            "  Resolve: {:?} ({} bytes, name={:?})",
            start.elapsed(),
            resolved.bytes.len(),
            resolved.name.as_ref().map(|n| n.as_str())
        );

        // Sniff
        let sniff_start = std::time::Instant::now();
        let sniffed = self.sniffer.sniff(&resolved.bytes)?;
        tracing::trace!("  Sniff: {:?} ({})", sniff_start.elapsed(), sniffed.mime);

        // Validate
        let kind = self
            .validator
            .validate(&sniffed, resolved.name.as_ref())
            .accept()?;
        tracing::trace!("  Route: {}", kind);

        // Decode
        let decode_start = std::time::Instant::now();
        let decoded = self.dispatcher.dispatch(&resolved.bytes, kind)?;
        tracing::trace!(
            "  Decode: {:?} ({}x{})",
            decode_start.elapsed(),
            decoded.width,
            decoded.height
        );

        // Hash
        let hash_start = std::time::Instant::now();
        let fingerprint = self.invoker.invoke(&decoded, request)?;
        tracing::trace!("  Hash: {:?}", hash_start.elapsed());

        tracing::debug!(
            "Fingerprinted {} image in {:?} ({}x{})",
            kind,
            start.elapsed(),
            decoded.width,
            decoded.height
        );
        Ok(fingerprint)
    }
}
