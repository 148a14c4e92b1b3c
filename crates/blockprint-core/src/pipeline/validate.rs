//! Reconciles the sniffed MIME type with the name hint.
//!
//! An extension, when present, must agree with the content. When no
//! extension is available the sniffed type decides alone and a diagnostic
//! event is emitted.

use std::sync::Arc;

use crate::types::{ImageKind, NameHint, Rejection, RoutingDecision, SniffedType};

use super::diagnostic::{DiagnosticEvent, DiagnosticSink, TracingSink};

/// Extensions accepted for each decodable format.
const EXTENSIONS: &[(&str, ImageKind)] = &[
    ("png", ImageKind::Png),
    ("jpg", ImageKind::Jpeg),
    ("jpeg", ImageKind::Jpeg),
];

/// Look up the format an extension stands for.
pub fn kind_for_extension(ext: &str) -> Option<ImageKind> {
    EXTENSIONS
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|&(_, kind)| kind)
}

/// Produces a routing decision for a sniffed payload.
pub struct Validator {
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl Validator {
    /// Create a validator that reports extension-less routing to `diagnostics`.
    pub fn new(diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self { diagnostics }
    }

    /// Decide which decoder, if any, may handle the payload.
    pub fn validate(&self, sniffed: &SniffedType, name: Option<&NameHint>) -> RoutingDecision {
        match name.and_then(NameHint::extension) {
            Some(ext) => Self::route_with_extension(ext, sniffed),
            None => {
                self.diagnostics.emit(DiagnosticEvent::NoExtension {
                    mime: sniffed.mime.clone(),
                });
                Self::route_by_mime(sniffed)
            }
        }
    }

    fn route_with_extension(ext: String, sniffed: &SniffedType) -> RoutingDecision {
        match kind_for_extension(&ext) {
            Some(kind) if kind.mime() == sniffed.mime => RoutingDecision::route(kind),
            _ => RoutingDecision::Rejected(Rejection::ExtensionMismatch {
                ext,
                mime: sniffed.mime.clone(),
            }),
        }
    }

    fn route_by_mime(sniffed: &SniffedType) -> RoutingDecision {
        match ImageKind::from_mime(&sniffed.mime) {
            Some(kind) => RoutingDecision::route(kind),
            None => RoutingDecision::Rejected(Rejection::UnsupportedMime {
                mime: sniffed.mime.clone(),
            }),
        }
    }
}
