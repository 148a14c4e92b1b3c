//! Fingerprinting pipeline components.
//!
//! Stages run strictly in order, and the first failure ends the invocation:
//! - **source**: Resolve a buffer, local path or URL into bytes and a name hint
//! - **fetch**: Retrieve remote references over HTTP(S)
//! - **sniff**: Detect the MIME type from byte content
//! - **validate**: Reconcile the MIME type with the name's extension
//! - **decode**: Decode PNG or JPEG bytes into pixels
//! - **hash**: Compute the perceptual block hash
//! - **diagnostic**: Non-fatal events raised along the way
//! - **processor**: Orchestrates the full pipeline

pub mod decode;
pub mod diagnostic;
pub mod fetch;
pub mod hash;
pub mod processor;
pub mod sniff;
pub mod source;
pub mod validate;

// Re-exports for convenient access
pub use decode::{DecodeDispatcher, DecodedImage, ImageDecoder, JpegDecoder, PngDecoder};
pub use diagnostic::{CollectingSink, DiagnosticEvent, DiagnosticSink, TracingSink};
pub use fetch::{FetchedResource, HttpFetcher, RemoteFetcher};
pub use hash::{BlockHasher, HashInvoker, PerceptualHasher};
pub use processor::FingerprintPipeline;
pub use sniff::{MimeSniffer, SignatureSniffer};
pub use source::{FileReader, ResolvedSource, SourceLocation, SourceResolver, TokioFileReader};
pub use validate::Validator;
