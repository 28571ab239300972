//! SQLite persistence for decoded GeoNames records.
//!
//! - [`initialise_schema`] materialises one table per [`DatasetKind`].
//! - [`GeonamesStore`] writes record batches into those tables.
//! - [`Importer`] drives a reader through transforms into any [`BatchWriter`].
#![forbid(unsafe_code)]

mod importer;
mod schema;
mod value;

use camino::{Utf8Path, Utf8PathBuf};
use geonames_core::Record;
use rusqlite::{Connection, Error as SqliteError, params_from_iter};
use thiserror::Error;

use crate::catalog::DatasetKind;

pub use importer::{
    DEFAULT_BATCH_SIZE, ImportError, ImportOptions, ImportReport, Importer,
};
pub use schema::{SCHEMA_VERSION, SchemaError, initialise_schema, recreate_schema};

use value::SqlValue;

/// Destination accepting decoded records one batch at a time.
///
/// Each call receives at most the importer's batch size of records, all of
/// the same kind and with identical field names.
pub trait BatchWriter {
    /// Error raised when a batch cannot be stored.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist `records` of `kind`.
    ///
    /// # Errors
    ///
    /// Implementations decide; a failed batch aborts the import.
    fn write_batch(&mut self, kind: DatasetKind, records: &[Record]) -> Result<(), Self::Error>;
}

/// A SQLite database holding the GeoNames tables.
///
/// # Examples
/// ```
/// use geonames_core::{FieldValue, Record};
/// use geonames_data::catalog::DatasetKind;
/// use geonames_data::store::{BatchWriter, GeonamesStore};
///
/// let mut store = GeonamesStore::open_in_memory()?;
/// let feature = Record::from(vec![
///     ("feature_class", FieldValue::from("P")),
///     ("feature_code", FieldValue::from("PPLC")),
///     ("name", FieldValue::from("capital of a political entity")),
///     ("description", FieldValue::from("")),
/// ]);
/// store.write_batch(DatasetKind::FeatureCode, &[feature])?;
/// assert_eq!(store.count(DatasetKind::FeatureCode)?, 1);
/// # Ok::<(), geonames_data::store::StoreError>(())
/// ```
#[derive(Debug)]
pub struct GeonamesStore {
    connection: Connection,
    path: Option<Utf8PathBuf>,
}

impl GeonamesStore {
    /// Open or create the database at `path` and initialise its schema.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the directory, the database or the schema
    /// cannot be prepared.
    pub fn open(path: &Utf8Path) -> Result<Self, StoreError> {
        let connection = connect(path)?;
        Self::with_connection(connection, Some(path.to_path_buf()))
    }

    /// Open or create the database at `path`, dropping and recreating every
    /// GeoNames table before the schema version is checked.
    ///
    /// Databases stamped by another schema version open cleanly this way.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the directory, the database or the schema
    /// cannot be prepared.
    pub fn open_recreated(path: &Utf8Path) -> Result<Self, StoreError> {
        let mut connection = connect(path)?;
        recreate_schema(&mut connection)?;
        Ok(Self {
            connection,
            path: Some(path.to_path_buf()),
        })
    }

    /// Create a transient database, mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: Utf8PathBuf::from(":memory:"),
            source,
        })?;
        Self::with_connection(connection, None)
    }

    fn with_connection(
        mut connection: Connection,
        path: Option<Utf8PathBuf>,
    ) -> Result<Self, StoreError> {
        initialise_schema(&mut connection)?;
        Ok(Self { connection, path })
    }

    /// Location of the database file, if it lives on disk.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    /// Borrow the underlying connection for ad hoc queries.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Drop and recreate every GeoNames table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Schema`] when a DDL step fails.
    pub fn recreate_tables(&mut self) -> Result<(), StoreError> {
        recreate_schema(&mut self.connection)?;
        Ok(())
    }

    /// Delete the rows of `kinds`, dependants before the tables they reference.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] when a delete fails; nothing is removed
    /// in that case.
    pub fn purge(&mut self, kinds: &[DatasetKind]) -> Result<(), StoreError> {
        let mut ordered = kinds.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let transaction = self
            .connection
            .transaction()
            .map_err(|source| StoreError::Sqlite {
                operation: "begin purge transaction",
                source,
            })?;
        for kind in ordered.iter().rev() {
            log::info!("Purging data from {}", kind.table());
            transaction
                .execute(&format!("DELETE FROM {}", kind.table()), [])
                .map_err(|source| StoreError::Sqlite {
                    operation: "purge table",
                    source,
                })?;
        }
        transaction.commit().map_err(|source| StoreError::Sqlite {
            operation: "commit purge transaction",
            source,
        })
    }

    /// Number of rows stored for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] when the count query fails.
    pub fn count(&self, kind: DatasetKind) -> Result<u64, StoreError> {
        let rows: i64 = self
            .connection
            .query_row(&format!("SELECT COUNT(*) FROM {}", kind.table()), [], |row| {
                row.get(0)
            })
            .map_err(|source| StoreError::Sqlite {
                operation: "count rows",
                source,
            })?;
        Ok(u64::try_from(rows).unwrap_or_default())
    }
}

impl BatchWriter for GeonamesStore {
    type Error = StoreError;

    fn write_batch(&mut self, kind: DatasetKind, records: &[Record]) -> Result<(), StoreError> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        let columns: Vec<&'static str> = first.keys().collect();
        let sql = insert_statement(kind.table(), &columns);

        let transaction = self
            .connection
            .transaction()
            .map_err(|source| StoreError::Sqlite {
                operation: "begin batch transaction",
                source,
            })?;
        {
            let mut insert =
                transaction
                    .prepare_cached(&sql)
                    .map_err(|source| StoreError::Sqlite {
                        operation: "prepare batch insert",
                        source,
                    })?;
            for (position, record) in records.iter().enumerate() {
                if !record.keys().eq(columns.iter().copied()) {
                    return Err(StoreError::ColumnsChanged {
                        table: kind.table(),
                        position,
                    });
                }
                insert
                    .execute(params_from_iter(record.values().map(SqlValue)))
                    .map_err(|source| StoreError::Sqlite {
                        operation: "insert record",
                        source,
                    })?;
            }
        }
        transaction.commit().map_err(|source| StoreError::Sqlite {
            operation: "commit batch transaction",
            source,
        })
    }
}

fn connect(path: &Utf8Path) -> Result<Connection, StoreError> {
    geonames_fs::ensure_parent_dir(path).map_err(|source| StoreError::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    Connection::open(path).map_err(|source| StoreError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn insert_statement(table: &str, columns: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|index| format!("?{index}")).collect();
    format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// Errors raised by [`GeonamesStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database directory could not be created.
    #[error("failed to create database directory for {path}")]
    CreateDir {
        /// Database path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// SQLite refused to open the database.
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Database path.
        path: Utf8PathBuf,
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
    /// Schema initialisation failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A batch mixed records with different field names.
    #[error("record {position} of a {table} batch has different columns from the first")]
    ColumnsChanged {
        /// Target table.
        table: &'static str,
        /// Zero-based position of the offending record in the batch.
        position: usize,
    },
    /// A SQLite statement failed.
    #[error("failed to {operation}")]
    Sqlite {
        /// Operation being attempted.
        operation: &'static str,
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
}
