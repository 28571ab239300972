//! Batched import of decoded dump files.

use std::num::NonZeroUsize;

use geonames_core::{DiagnosticSink, Record};
use serde::Serialize;
use thiserror::Error;

use super::BatchWriter;
use crate::catalog::{DatasetKind, ImportJob};
use crate::reader::{ReaderError, RecordReader};
use crate::transform::{RecordTransform, TransformError};

/// Records per batch when no other size is configured.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(500) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Tunables for [`Importer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Maximum records handed to the writer at once.
    pub batch_size: NonZeroUsize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Outcome of importing one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Source name of the imported input.
    pub file_name: String,
    /// Dataset the records belong to.
    pub kind: DatasetKind,
    /// Records written.
    pub records: usize,
    /// Batches handed to the writer.
    pub batches: usize,
}

/// Errors raised while importing.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Decoding the input failed.
    #[error(transparent)]
    Read(#[from] ReaderError),
    /// A record transform rejected a decoded record.
    #[error("record {record} of {file_name} could not be transformed")]
    Transform {
        /// Source name of the input.
        file_name: String,
        /// Zero-based index of the record among those decoded.
        record: usize,
        /// Transform failure.
        #[source]
        source: TransformError,
    },
    /// The writer rejected a batch.
    #[error("failed to write a {kind} batch")]
    Write {
        /// Dataset being written.
        kind: DatasetKind,
        /// Writer failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Streams records from dump files into a [`BatchWriter`].
///
/// Records are transformed as they are decoded and flushed in batches of
/// exactly [`ImportOptions::batch_size`], with a final partial batch for the
/// remainder. A failure stops the import; batches already written stay
/// written.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use geonames_core::LogSink;
/// use geonames_data::catalog::DatasetKind;
/// use geonames_data::reader::RecordReader;
/// use geonames_data::store::{GeonamesStore, Importer};
///
/// let mut store = GeonamesStore::open_in_memory()?;
/// let kind = DatasetKind::Hierarchy;
/// let reader = RecordReader::new(
///     Cursor::new("6295630\t6255146\tADM\n6255146\t3144096\tADM\n"),
///     "hierarchy.txt",
///     kind.schema(),
///     &LogSink,
/// );
/// let report = Importer::new(&mut store, &LogSink).run_records("hierarchy.txt", kind, reader)?;
///
/// assert_eq!(report.records, 2);
/// assert_eq!(store.count(kind)?, 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Importer<'a, W> {
    writer: &'a mut W,
    sink: &'a dyn DiagnosticSink,
    options: ImportOptions,
}

impl<'a, W: BatchWriter> Importer<'a, W> {
    /// Import into `writer`, reporting row diagnostics to `sink`.
    pub fn new(writer: &'a mut W, sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            writer,
            sink,
            options: ImportOptions::default(),
        }
    }

    /// Replace the default options.
    #[must_use]
    pub const fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// Decode and store the file named by `job`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] when the file cannot be read or decoded, a
    /// transform fails, or the writer rejects a batch.
    pub fn run(&mut self, job: &ImportJob) -> Result<ImportReport, ImportError> {
        let kind = job.kind();
        log::info!("Importing {kind} records from {}", job.path);
        let reader = RecordReader::open(&job.path, kind.schema(), self.sink)?;
        self.run_records(job.path.as_str(), kind, reader)
    }

    /// Run every job in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`ImportError`] encountered.
    pub fn run_all(&mut self, jobs: &[ImportJob]) -> Result<Vec<ImportReport>, ImportError> {
        jobs.iter().map(|job| self.run(job)).collect()
    }

    /// Transform and store already decoded `records` of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] for the first failing record or batch.
    pub fn run_records<I>(
        &mut self,
        file_name: &str,
        kind: DatasetKind,
        records: I,
    ) -> Result<ImportReport, ImportError>
    where
        I: IntoIterator<Item = Result<Record, ReaderError>>,
    {
        let batch_size = self.options.batch_size.get();
        let mut batch = Vec::with_capacity(batch_size);
        let mut report = ImportReport {
            file_name: file_name.to_owned(),
            kind,
            records: 0,
            batches: 0,
        };

        for (index, decoded) in records.into_iter().enumerate() {
            let record = RecordTransform::apply_all(kind.transforms(), decoded?).map_err(
                |source| ImportError::Transform {
                    file_name: file_name.to_owned(),
                    record: index,
                    source,
                },
            )?;
            batch.push(record);
            if batch.len() == batch_size {
                self.flush(&mut report, &mut batch)?;
            }
        }
        if !batch.is_empty() {
            self.flush(&mut report, &mut batch)?;
        }

        log::info!(
            "Imported {} {} records from {} in {} batches",
            report.records,
            kind,
            file_name,
            report.batches
        );
        Ok(report)
    }

    fn flush(
        &mut self,
        report: &mut ImportReport,
        batch: &mut Vec<Record>,
    ) -> Result<(), ImportError> {
        self.writer
            .write_batch(report.kind, batch)
            .map_err(|source| ImportError::Write {
                kind: report.kind,
                source: Box::new(source),
            })?;
        report.records += batch.len();
        report.batches += 1;
        log::debug!(
            "Stored batch {} of {} ({} records so far)",
            report.batches,
            report.file_name,
            report.records
        );
        batch.clear();
        Ok(())
    }
}

impl<W> std::fmt::Debug for Importer<'_, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Importer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
