#![forbid(unsafe_code)]

use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction};
use thiserror::Error;

use crate::catalog::DatasetKind;

/// Version recorded in `geonames_schema_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Create the GeoNames tables inside an existing SQLite database.
///
/// Foreign keys are enabled on the connection, every dataset table is
/// created when absent and the schema version is recorded. Databases stamped
/// with another version are rejected.
///
/// # Errors
///
/// Returns [`SchemaError`] when a migration step fails or the recorded
/// version differs from [`SCHEMA_VERSION`].
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use geonames_data::store::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create GeoNames schema");
///
/// let version: i64 = conn
///     .query_row("SELECT version FROM geonames_schema_version", [], |row| row.get(0))
///     .expect("read schema version");
/// assert_eq!(version, 1);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| SchemaError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_reference_tables(&transaction)?;
    create_geoname_table(&transaction)?;
    create_relation_tables(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction.commit().map_err(|source| SchemaError::Migration {
        step: "commit schema transaction",
        source,
    })
}

/// Drop every GeoNames table, dependants first, then recreate the schema.
///
/// # Errors
///
/// Returns [`SchemaError`] when a drop or a migration step fails.
pub fn recreate_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    {
        let transaction = connection
            .transaction()
            .map_err(|source| SchemaError::Migration {
                step: "begin drop transaction",
                source,
            })?;
        for kind in DatasetKind::ALL.iter().rev() {
            log::info!("Dropping table {}", kind.table());
            run_migration_step(
                &transaction,
                "drop dataset table",
                &format!("DROP TABLE IF EXISTS {}", kind.table()),
            )?;
        }
        run_migration_step(
            &transaction,
            "drop schema version table",
            "DROP TABLE IF EXISTS geonames_schema_version",
        )?;
        transaction.commit().map_err(|source| SchemaError::Migration {
            step: "commit drop transaction",
            source,
        })?;
    }
    initialise_schema(connection)
}

fn create_reference_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create geonamefeature",
        "CREATE TABLE IF NOT EXISTS geonamefeature (
            feature_code TEXT PRIMARY KEY,
            feature_class TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL
        )",
    )?;
    run_migration_step(
        transaction,
        "create geonametimezone",
        "CREATE TABLE IF NOT EXISTS geonametimezone (
            timezone_id TEXT PRIMARY KEY,
            country_code TEXT NOT NULL,
            gmt_offset TEXT NOT NULL,
            dst_offset TEXT NOT NULL,
            raw_offset TEXT NOT NULL
        )",
    )?;
    run_migration_step(
        transaction,
        "create geonamecountry",
        "CREATE TABLE IF NOT EXISTS geonamecountry (
            iso TEXT PRIMARY KEY,
            iso3 TEXT NOT NULL,
            iso_numeric TEXT NOT NULL,
            fips TEXT NOT NULL,
            country TEXT NOT NULL,
            capital TEXT NOT NULL,
            area_in_sq_km INTEGER,
            population INTEGER NOT NULL,
            continent TEXT NOT NULL,
            tld TEXT NOT NULL,
            currency_code TEXT NOT NULL,
            currency_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            postal_code_format TEXT NOT NULL,
            postal_code_regex TEXT NOT NULL,
            languages TEXT NOT NULL,
            geonameid INTEGER,
            neighbours TEXT NOT NULL,
            equivalent_fips_code TEXT NOT NULL
        )",
    )
}

fn create_geoname_table(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create geoname",
        "CREATE TABLE IF NOT EXISTS geoname (
            geonameid INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            asciiname TEXT NOT NULL,
            alternatenames TEXT NOT NULL,
            latitude TEXT NOT NULL,
            longitude TEXT NOT NULL,
            feature_class TEXT NOT NULL,
            feature_code TEXT REFERENCES geonamefeature(feature_code),
            country_code TEXT REFERENCES geonamecountry(iso),
            cc2 TEXT NOT NULL,
            admin1_code TEXT NOT NULL,
            admin2_code TEXT NOT NULL,
            admin3_code TEXT NOT NULL,
            admin4_code TEXT NOT NULL,
            population INTEGER NOT NULL,
            elevation INTEGER,
            dem TEXT NOT NULL,
            timezone_id TEXT REFERENCES geonametimezone(timezone_id),
            modification_date TEXT NOT NULL,
            point TEXT NOT NULL
        )",
    )?;
    run_migration_step(
        transaction,
        "index geoname country",
        "CREATE INDEX IF NOT EXISTS idx_geoname_country ON geoname(country_code)",
    )
}

fn create_relation_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create geonamehierarchy",
        "CREATE TABLE IF NOT EXISTS geonamehierarchy (
            parent_id INTEGER NOT NULL,
            child_id INTEGER NOT NULL,
            hierarchy_type TEXT NOT NULL
        )",
    )?;
    run_migration_step(
        transaction,
        "index geonamehierarchy",
        "CREATE INDEX IF NOT EXISTS idx_geonamehierarchy_child
            ON geonamehierarchy(child_id, parent_id)",
    )?;
    run_migration_step(
        transaction,
        "create geonamealternatename",
        "CREATE TABLE IF NOT EXISTS geonamealternatename (
            alternatenameid INTEGER PRIMARY KEY,
            geonameid INTEGER NOT NULL,
            isolanguage TEXT NOT NULL,
            alternate_name TEXT NOT NULL,
            is_preferred_name INTEGER,
            is_short_name INTEGER,
            is_colloquial INTEGER,
            is_historic INTEGER,
            from_period TEXT NOT NULL,
            to_period TEXT NOT NULL
        )",
    )?;
    run_migration_step(
        transaction,
        "index geonamealternatename",
        "CREATE INDEX IF NOT EXISTS idx_geonamealternatename_geoname
            ON geonamealternatename(geonameid, isolanguage)",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS geonames_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing: Option<i64> = transaction
        .query_row(
            "SELECT version FROM geonames_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| SchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing {
        Some(version) if version == SCHEMA_VERSION => Ok(()),
        Some(found) => Err(SchemaError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO geonames_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| SchemaError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

/// Errors raised when initialising the GeoNames schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// `PRAGMA foreign_keys` could not be enabled.
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
    /// A DDL statement failed.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// Name of the failing step.
        step: &'static str,
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
    /// The database was created by an incompatible release.
    #[error(
        "expected GeoNames schema version {expected} but found {found}; recreate the tables before retrying"
    )]
    VersionMismatch {
        /// Version this build writes.
        expected: i64,
        /// Version stamped in the database.
        found: i64,
    },
}
