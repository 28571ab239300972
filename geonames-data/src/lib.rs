//! Decoding, storage and download of GeoNames export dumps.
//!
//! - [`reader`] streams delimited dump files into typed records.
//! - [`datasets`] declares the schema of every supported dump variant.
//! - [`transform`] rewrites decoded records before storage.
//! - [`catalog`] maps file names to datasets and orders import jobs.
//! - [`store`] persists records into SQLite in fixed-size batches.
//! - [`download`] fetches export files from the GeoNames mirror.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod catalog;
pub mod datasets;
pub mod download;
pub mod reader;
pub mod store;
pub mod transform;
