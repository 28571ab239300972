//! Core decoding vocabulary for GeoNames dumps.
//!
//! A [`RecordSchema`] declares the ordered fields of one dataset variant and
//! how its rows are tolerated. Each field names a [`DecodeKind`] that turns
//! raw cell text into a [`FieldValue`]. Row-level problems are reported as
//! [`Diagnostic`] values through an injected [`DiagnosticSink`].

#![cfg_attr(docsrs, feature(doc_cfg))]

mod diagnostics;
mod kind;
mod schema;
mod value;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use diagnostics::{Diagnostic, DiagnosticSink, LOG_TARGET, LogSink};
pub use kind::{DecodeError, DecodeKind};
pub use schema::{ExcessCells, FieldDescriptor, RecordSchema, RowPreprocess};
pub use value::{FieldValue, Record};
