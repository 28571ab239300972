//! Row-level diagnostics emitted while decoding.
//!
//! The decoder never prints. It hands each [`Diagnostic`] to an injected
//! [`DiagnosticSink`]; production code uses [`LogSink`], which forwards to
//! the `log` facade, and tests record diagnostics for inspection.

use std::fmt;

use log::Level;

/// Log target used by [`LogSink`].
pub const LOG_TARGET: &str = "geonames::reader";

/// Something noteworthy that happened to a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A row's cell count differed from the schema's field count.
    ShapeMismatch {
        /// Name of the input being decoded.
        source: String,
        /// Zero-based physical row index.
        row: usize,
        /// Cells found on the row.
        actual: usize,
        /// Cells the schema declares.
        expected: usize,
    },
    /// A short row was discarded.
    ShortRowSkipped {
        /// Name of the input being decoded.
        source: String,
        /// Zero-based physical row index.
        row: usize,
    },
    /// A cell failed to decode.
    DecodeFailure {
        /// Name of the input being decoded.
        source: String,
        /// Zero-based physical row index.
        row: usize,
        /// Field whose cell failed.
        field: &'static str,
        /// Raw cell text.
        raw: String,
        /// Human-readable cause.
        reason: String,
    },
}

impl Diagnostic {
    /// Severity suggested for this diagnostic.
    #[must_use]
    pub const fn level(&self) -> Level {
        match self {
            Self::ShapeMismatch { .. } | Self::ShortRowSkipped { .. } => Level::Warn,
            Self::DecodeFailure { .. } => Level::Error,
        }
    }

    /// Zero-based physical row the diagnostic refers to.
    #[must_use]
    pub const fn row(&self) -> usize {
        match self {
            Self::ShapeMismatch { row, .. }
            | Self::ShortRowSkipped { row, .. }
            | Self::DecodeFailure { row, .. } => *row,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                source,
                row,
                actual,
                expected,
            } => write!(
                f,
                "Row #{row} in {source} contained {actual} cell values instead of the expected {expected}."
            ),
            Self::ShortRowSkipped { source, row } => {
                write!(f, "Skipping short row #{row} in {source}.")
            }
            Self::DecodeFailure {
                source,
                row,
                field,
                raw,
                reason,
            } => write!(
                f,
                "Row #{row} in {source}: field `{field}` could not decode {raw:?}: {reason}"
            ),
        }
    }
}

/// Receiver for decoder diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// Accept one diagnostic.
    fn record(&self, diagnostic: &Diagnostic);
}

/// Sink that forwards diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn record(&self, diagnostic: &Diagnostic) {
        log::log!(target: LOG_TARGET, diagnostic.level(), "{diagnostic}");
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn record(&self, diagnostic: &Diagnostic) {
        (**self).record(diagnostic);
    }
}
