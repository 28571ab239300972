//! Streaming decoder turning delimited dump text into typed records.
//!
//! [`RecordReader`] pulls one physical line at a time from a [`BufRead`]
//! source, applies the row acceptance rules of its [`RecordSchema`] and yields
//! one [`Record`] per accepted row. Nothing beyond the current line is held in
//! memory, so multi-million row dumps stream in constant space.
#![forbid(unsafe_code)]

mod error;

use std::io::BufRead;
use std::iter::FusedIterator;

use camino::Utf8Path;
use geonames_core::{Diagnostic, DiagnosticSink, ExcessCells, Record, RecordSchema};
use geonames_fs::DumpReader;

pub use error::ReaderError;

/// Lazy, single-pass decoder over one input.
///
/// The reader owns its input handle and releases it as soon as the input is
/// exhausted, a fatal error is yielded, or the reader is dropped. It is not
/// restartable: once `next` has returned `None` or an error it keeps
/// returning `None`. Open a fresh reader to decode the input again.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use geonames_core::{DecodeKind, FieldDescriptor, FieldValue, LogSink, RecordSchema};
/// use geonames_data::reader::RecordReader;
///
/// const FIELDS: &[FieldDescriptor] = &[
///     FieldDescriptor::new("a", DecodeKind::Integer),
///     FieldDescriptor::new("b", DecodeKind::Text),
/// ];
/// let schema = RecordSchema::new(FIELDS);
/// let input = Cursor::new("1\tx\n2\ty\n");
/// let records = RecordReader::new(input, "inline", &schema, &LogSink)
///     .collect::<Result<Vec<_>, _>>()?;
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].get("a"), Some(&FieldValue::Integer(2)));
/// # Ok::<(), geonames_data::reader::ReaderError>(())
/// ```
pub struct RecordReader<'a, R> {
    input: Option<R>,
    source_name: String,
    schema: &'a RecordSchema,
    sink: &'a dyn DiagnosticSink,
    row: usize,
    line: String,
}

impl<'a> RecordReader<'a, DumpReader> {
    /// Open `path` and decode it with `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::Open`] when the file cannot be opened.
    pub fn open(
        path: &Utf8Path,
        schema: &'a RecordSchema,
        sink: &'a dyn DiagnosticSink,
    ) -> Result<Self, ReaderError> {
        let input = geonames_fs::open_buffered(path).map_err(|source| ReaderError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(input, path.as_str(), schema, sink))
    }
}

impl<'a, R: BufRead> RecordReader<'a, R> {
    /// Decode `input` with `schema`, naming it `source_name` in diagnostics.
    pub fn new(
        input: R,
        source_name: impl Into<String>,
        schema: &'a RecordSchema,
        sink: &'a dyn DiagnosticSink,
    ) -> Self {
        Self {
            input: Some(input),
            source_name: source_name.into(),
            schema,
            sink,
            row: 0,
            line: String::new(),
        }
    }

    /// Zero-based index of the next physical line to be read.
    #[must_use]
    pub const fn row_index(&self) -> usize {
        self.row
    }

    /// Name used for this input in diagnostics and errors.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Report whether the input handle has been released.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.input.is_none()
    }

    fn accept(&self, row: usize) -> Result<Option<Record>, ReaderError> {
        let schema = self.schema;
        if row < schema.start_row() || schema.is_comment(&self.line) {
            return Ok(None);
        }

        let delimiter = schema.delimiter();
        let rewritten = schema.preprocess().apply(&self.line, delimiter);
        let mut cells: Vec<&str> = strip_line_ending(&rewritten).split(delimiter).collect();

        let expected = schema.field_count();
        let actual = cells.len();
        if actual != expected {
            self.sink.record(&Diagnostic::ShapeMismatch {
                source: self.source_name.clone(),
                row,
                actual,
                expected,
            });
            if actual < expected && schema.skips_short_rows() {
                self.sink.record(&Diagnostic::ShortRowSkipped {
                    source: self.source_name.clone(),
                    row,
                });
                return Ok(None);
            }
            if actual < expected && schema.pads_short_rows() {
                cells.resize(expected, "");
            }
        }

        let still_short = cells.len() < expected;
        let rejected_excess =
            cells.len() > expected && schema.excess_cells() == ExcessCells::Reject;
        if still_short || rejected_excess {
            return Err(ReaderError::CellCount {
                source_name: self.source_name.clone(),
                row,
                actual,
                expected,
            });
        }

        self.decode_cells(row, &cells).map(Some)
    }

    fn decode_cells(&self, row: usize, cells: &[&str]) -> Result<Record, ReaderError> {
        let mut entries = Vec::with_capacity(cells.len());
        for (field, raw) in self.schema.fields().iter().zip(cells) {
            match field.kind.decode(raw) {
                Ok(value) => entries.push((field.name, value)),
                Err(source) => {
                    self.sink.record(&Diagnostic::DecodeFailure {
                        source: self.source_name.clone(),
                        row,
                        field: field.name,
                        raw: (*raw).to_owned(),
                        reason: source.to_string(),
                    });
                    return Err(ReaderError::Decode {
                        source_name: self.source_name.clone(),
                        row,
                        field: field.name,
                        raw: (*raw).to_owned(),
                        source,
                    });
                }
            }
        }
        Ok(Record::from(entries))
    }
}

impl<R: BufRead> Iterator for RecordReader<'_, R> {
    type Item = Result<Record, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let input = self.input.as_mut()?;
            self.line.clear();
            match input.read_line(&mut self.line) {
                Ok(0) => {
                    self.input = None;
                    return None;
                }
                Ok(_) => {}
                Err(source) => {
                    self.input = None;
                    return Some(Err(ReaderError::ReadLine {
                        source_name: self.source_name.clone(),
                        row: self.row,
                        source,
                    }));
                }
            }

            let row = self.row;
            self.row += 1;
            match self.accept(row) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(err) => {
                    self.input = None;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<R: BufRead> FusedIterator for RecordReader<'_, R> {}

impl<R> std::fmt::Debug for RecordReader<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordReader")
            .field("source_name", &self.source_name)
            .field("row", &self.row)
            .field("finished", &self.input.is_none())
            .finish_non_exhaustive()
    }
}

fn strip_line_ending(line: &str) -> &str {
    let body = line.strip_suffix('\n').unwrap_or(line);
    body.strip_suffix('\r').unwrap_or(body)
}
