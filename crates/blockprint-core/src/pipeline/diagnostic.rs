//! Informational events emitted while routing a payload.
//!
//! Diagnostics never fail an invocation. The default sink forwards them to
//! `tracing`; tests and embedders can collect them instead.

use std::sync::Mutex;

/// A non-fatal event raised by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// The name hint carried no extension, so routing used the sniffed MIME type alone
    NoExtension { mime: String },
}

impl DiagnosticEvent {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoExtension { .. } => "No file extension found, attempting mime typing.",
        }
    }
}

/// Receiver for diagnostic events.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, event: DiagnosticEvent);
}

/// Logs every event at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, event: DiagnosticEvent) {
        match &event {
            DiagnosticEvent::NoExtension { mime } => {
                tracing::warn!(mime = %mime, "{}", event.message());
            }
        }
    }
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, event: DiagnosticEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
