//! Core data types flowing through the fingerprinting pipeline.
//!
//! Every value here is created and consumed within a single invocation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PipelineError;

/// Where the image bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Bytes already in memory, with an optional label used as the name hint
    Buffer { bytes: Vec<u8>, name: Option<String> },
    /// A local path or a remote URL, classified at resolution time
    Reference(String),
}

impl ImageSource {
    /// In-memory bytes without a name.
    pub fn buffer(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Buffer {
            bytes: bytes.into(),
            name: None,
        }
    }

    /// In-memory bytes labelled with a file name (e.g. "photo.png").
    pub fn named_buffer(bytes: impl Into<Vec<u8>>, name: impl Into<String>) -> Self {
        Self::Buffer {
            bytes: bytes.into(),
            name: Some(name.into()),
        }
    }

    /// A path or URL to resolve.
    pub fn reference(reference: impl Into<String>) -> Self {
        Self::Reference(reference.into())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::buffer(bytes)
    }
}

impl From<&str> for ImageSource {
    fn from(reference: &str) -> Self {
        Self::reference(reference)
    }
}

impl From<String> for ImageSource {
    fn from(reference: String) -> Self {
        Self::Reference(reference)
    }
}

/// Last path segment of a resolved source, used to corroborate the content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameHint(String);

impl NameHint {
    /// Build a hint from a name, keeping only its last `/`-separated segment.
    ///
    /// Returns `None` for empty names.
    pub fn new(name: &str) -> Option<Self> {
        let segment = name.rsplit(['/', '\\']).next().unwrap_or(name);
        if segment.is_empty() {
            None
        } else {
            Some(Self(segment.to_string()))
        }
    }

    /// The file name this hint wraps.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased text after the last `.`, when that dot is not the first character.
    ///
    /// A trailing dot yields `Some("")`: an extension is present but unusable.
    pub fn extension(&self) -> Option<String> {
        self.0
            .rfind('.')
            .filter(|&idx| idx > 0)
            .map(|idx| self.0[idx + 1..].to_ascii_lowercase())
    }
}

impl fmt::Display for NameHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// MIME type derived from byte content alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffedType {
    pub mime: String,
}

impl SniffedType {
    pub fn new(mime: impl Into<String>) -> Self {
        Self { mime: mime.into() }
    }
}

/// Image formats the pipeline can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Canonical MIME type for this format.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Look up the format for a canonical MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => f.write_str("png"),
            Self::Jpeg => f.write_str("jpeg"),
        }
    }
}

/// Why the validator refused to route a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Extension present but unknown or inconsistent with the sniffed MIME type
    ExtensionMismatch { ext: String, mime: String },
    /// No extension, and the sniffed MIME type has no decoder
    UnsupportedMime { mime: String },
}

/// Outcome of reconciling the sniffed type with the name hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    Png,
    Jpeg,
    Rejected(Rejection),
}

impl RoutingDecision {
    pub(crate) fn route(kind: ImageKind) -> Self {
        match kind {
            ImageKind::Png => Self::Png,
            ImageKind::Jpeg => Self::Jpeg,
        }
    }

    /// The decoder to use, or the rejection as a pipeline error.
    pub fn accept(self) -> Result<ImageKind, PipelineError> {
        match self {
            Self::Png => Ok(ImageKind::Png),
            Self::Jpeg => Ok(ImageKind::Jpeg),
            Self::Rejected(Rejection::ExtensionMismatch { ext, mime }) => {
                Err(PipelineError::ExtensionMismatch { ext, mime })
            }
            Self::Rejected(Rejection::UnsupportedMime { mime }) => {
                Err(PipelineError::UnsupportedMime { mime })
            }
        }
    }
}

/// Caller-selected hashing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashMethod {
    Quick,
    #[default]
    Precise,
}

impl HashMethod {
    /// Numeric selector forwarded to the perceptual hasher.
    pub fn selector(self) -> u8 {
        match self {
            Self::Quick => 1,
            Self::Precise => 2,
        }
    }
}

impl From<bool> for HashMethod {
    /// `true` selects the precise method.
    fn from(precise: bool) -> Self {
        if precise {
            Self::Precise
        } else {
            Self::Quick
        }
    }
}

impl fmt::Display for HashMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quick => f.write_str("quick"),
            Self::Precise => f.write_str("precise"),
        }
    }
}

/// Hash parameters supplied by the caller, forwarded unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashRequest {
    /// Grid resolution of the hash
    pub bits: u32,
    /// Hashing strategy
    pub method: HashMethod,
}

impl HashRequest {
    pub fn new(bits: u32, method: HashMethod) -> Self {
        Self { bits, method }
    }
}

/// Opaque fingerprint produced by the perceptual hasher.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
