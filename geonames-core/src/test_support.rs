//! Test-only diagnostic sink used by unit and behaviour tests.

use std::sync::{Mutex, PoisonError};

use crate::{Diagnostic, DiagnosticSink};

/// Sink that keeps every diagnostic it receives, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    seen: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of diagnostics recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Report whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, diagnostic: &Diagnostic) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }
}
