//! Error types produced by the streaming decoder.

use std::io;

use camino::Utf8PathBuf;
use geonames_core::DecodeError;
use thiserror::Error;

/// Fatal conditions that end a decode session.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The input file could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        /// Path that was requested.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Reading a line failed, including on invalid UTF-8.
    #[error("failed to read row #{row} of {source_name}: {source}")]
    ReadLine {
        /// Name of the input being decoded.
        source_name: String,
        /// Zero-based physical row index.
        row: usize,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A cell could not be decoded into its field's kind.
    #[error("row #{row} of {source_name}: field `{field}` rejected {raw:?}: {source}")]
    Decode {
        /// Name of the input being decoded.
        source_name: String,
        /// Zero-based physical row index.
        row: usize,
        /// Field whose cell failed.
        field: &'static str,
        /// Raw cell text.
        raw: String,
        /// Decoder failure.
        #[source]
        source: DecodeError,
    },
    /// A row's cell count could not be reconciled with the schema.
    #[error(
        "row #{row} of {source_name} has {actual} cells but the schema declares {expected}"
    )]
    CellCount {
        /// Name of the input being decoded.
        source_name: String,
        /// Zero-based physical row index.
        row: usize,
        /// Cells found on the row before padding.
        actual: usize,
        /// Cells the schema declares.
        expected: usize,
    },
}

impl ReaderError {
    /// Zero-based row the error refers to, when it concerns a row.
    #[must_use]
    pub const fn row(&self) -> Option<usize> {
        match self {
            Self::Open { .. } => None,
            Self::ReadLine { row, .. } | Self::Decode { row, .. } | Self::CellCount { row, .. } => {
                Some(*row)
            }
        }
    }
}
