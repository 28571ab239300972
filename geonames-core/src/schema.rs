//! Declarative record schemas describing one dataset variant.

use std::borrow::Cow;

use crate::DecodeKind;

/// One column of a dataset: a unique field name and its decode kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name exposed on decoded records.
    pub name: &'static str,
    /// Decode kind applied to the raw cell text.
    pub kind: DecodeKind,
}

impl FieldDescriptor {
    /// Construct a descriptor; usable in `const` field tables.
    #[must_use]
    pub const fn new(name: &'static str, kind: DecodeKind) -> Self {
        Self { name, kind }
    }
}

/// Rewrite applied to a row's text before it is split into cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPreprocess {
    /// Leave rows untouched.
    #[default]
    None,
    /// Replace the first occurrence of the character with the delimiter.
    ///
    /// Feature-code dumps join class and code as `A.ADM1`; rewriting the
    /// first `.` splits them into two cells.
    FirstToDelimiter(char),
}

impl RowPreprocess {
    /// Apply the rewrite to `line`, borrowing when nothing changes.
    #[must_use]
    pub fn apply(self, line: &str, delimiter: char) -> Cow<'_, str> {
        match self {
            Self::FirstToDelimiter(target) if line.contains(target) => {
                let mut encoded = [0_u8; 4];
                Cow::Owned(line.replacen(target, delimiter.encode_utf8(&mut encoded), 1))
            }
            Self::None | Self::FirstToDelimiter(_) => Cow::Borrowed(line),
        }
    }
}

/// Policy for rows carrying more cells than the schema declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExcessCells {
    /// Treat surplus cells as a fatal shape fault.
    #[default]
    Reject,
    /// Decode the declared fields and drop the surplus.
    Ignore,
}

/// Ordered field descriptors plus the row-handling policy for a dataset.
///
/// Field names and decode kinds are projected once at construction; the
/// descriptor table never changes afterwards.
///
/// # Examples
///
/// ```
/// use geonames_core::{DecodeKind, FieldDescriptor, RecordSchema};
///
/// const FIELDS: &[FieldDescriptor] = &[
///     FieldDescriptor::new("a", DecodeKind::Integer),
///     FieldDescriptor::new("b", DecodeKind::Text),
/// ];
/// let schema = RecordSchema::new(FIELDS).with_start_row(1).with_pad_short_rows(true);
///
/// assert_eq!(schema.field_names(), ["a", "b"]);
/// assert_eq!(schema.delimiter(), '\t');
/// assert!(schema.is_comment("# header"));
/// ```
#[derive(Debug, Clone)]
pub struct RecordSchema {
    fields: &'static [FieldDescriptor],
    names: Box<[&'static str]>,
    kinds: Box<[DecodeKind]>,
    start_row: usize,
    delimiter: char,
    comment_marker: Option<char>,
    pad_short_rows: bool,
    skip_short_rows: bool,
    preprocess: RowPreprocess,
    excess_cells: ExcessCells,
}

impl RecordSchema {
    /// Build a schema with tab delimiters, `#` comments and no row tolerance.
    #[must_use]
    pub fn new(fields: &'static [FieldDescriptor]) -> Self {
        Self {
            fields,
            names: fields.iter().map(|field| field.name).collect(),
            kinds: fields.iter().map(|field| field.kind).collect(),
            start_row: 0,
            delimiter: '\t',
            comment_marker: Some('#'),
            pad_short_rows: false,
            skip_short_rows: false,
            preprocess: RowPreprocess::None,
            excess_cells: ExcessCells::Reject,
        }
    }

    /// Skip physical lines below `start_row`, comments included.
    #[must_use]
    pub const fn with_start_row(mut self, start_row: usize) -> Self {
        self.start_row = start_row;
        self
    }

    /// Override the cell delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Override or disable the comment marker.
    #[must_use]
    pub const fn with_comment_marker(mut self, marker: Option<char>) -> Self {
        self.comment_marker = marker;
        self
    }

    /// Pad short rows with empty cells instead of failing.
    #[must_use]
    pub const fn with_pad_short_rows(mut self, pad: bool) -> Self {
        self.pad_short_rows = pad;
        self
    }

    /// Discard short rows; checked before padding.
    #[must_use]
    pub const fn with_skip_short_rows(mut self, skip: bool) -> Self {
        self.skip_short_rows = skip;
        self
    }

    /// Rewrite each row before splitting.
    #[must_use]
    pub const fn with_preprocess(mut self, preprocess: RowPreprocess) -> Self {
        self.preprocess = preprocess;
        self
    }

    /// Choose how rows with surplus cells are treated.
    #[must_use]
    pub const fn with_excess_cells(mut self, policy: ExcessCells) -> Self {
        self.excess_cells = policy;
        self
    }

    /// Field descriptors in declaration order.
    #[must_use]
    pub const fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// Field names in declaration order.
    #[must_use]
    pub fn field_names(&self) -> &[&'static str] {
        &self.names
    }

    /// Decode kinds in declaration order.
    #[must_use]
    pub fn decode_kinds(&self) -> &[DecodeKind] {
        &self.kinds
    }

    /// Number of cells a well-formed row carries.
    #[must_use]
    pub const fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// First physical row that may yield a record.
    #[must_use]
    pub const fn start_row(&self) -> usize {
        self.start_row
    }

    /// Cell delimiter.
    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Comment marker, if comments are recognised.
    #[must_use]
    pub const fn comment_marker(&self) -> Option<char> {
        self.comment_marker
    }

    /// Whether short rows are padded.
    #[must_use]
    pub const fn pads_short_rows(&self) -> bool {
        self.pad_short_rows
    }

    /// Whether short rows are discarded.
    #[must_use]
    pub const fn skips_short_rows(&self) -> bool {
        self.skip_short_rows
    }

    /// Row rewrite applied before splitting.
    #[must_use]
    pub const fn preprocess(&self) -> RowPreprocess {
        self.preprocess
    }

    /// Policy for surplus cells.
    #[must_use]
    pub const fn excess_cells(&self) -> ExcessCells {
        self.excess_cells
    }

    /// Report whether `line` starts with the comment marker.
    #[must_use]
    pub fn is_comment(&self, line: &str) -> bool {
        self.comment_marker
            .is_some_and(|marker| line.starts_with(marker))
    }
}
