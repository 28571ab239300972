//! Facade crate for the GeoNames dump importer.
//!
//! This crate re-exports the record model from `geonames-core` and the
//! dataset catalog, decoder, store and downloader from `geonames-data`.

#![forbid(unsafe_code)]

pub use geonames_core::{
    DecodeError, DecodeKind, Diagnostic, DiagnosticSink, ExcessCells, FieldDescriptor, FieldValue,
    LogSink, Record, RecordSchema, RowPreprocess,
};

pub use geonames_data::catalog::{
    CATALOG, CatalogEntry, DatasetKind, ImportJob, download_selection, plan_imports,
};
pub use geonames_data::reader::{ReaderError, RecordReader};
pub use geonames_data::store::{BatchWriter, GeonamesStore, ImportReport, Importer, StoreError};

pub use geonames_data::{catalog, datasets, download, reader, store, transform};
