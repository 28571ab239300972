use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::{Connection, params};

use super::{DownloadReport, GeonamesDownloadError};

/// Persisted audit trail of downloads.
#[derive(Debug)]
pub struct DownloadLog {
    connection: Connection,
    location: Utf8PathBuf,
}

impl DownloadLog {
    /// Open (or create) the download log at the supplied path.
    ///
    /// # Errors
    ///
    /// Returns [`GeonamesDownloadError`] when the parent directory, the database or
    /// its table cannot be created.
    pub fn initialise(path: &Utf8Path) -> Result<Self, GeonamesDownloadError> {
        geonames_fs::ensure_parent_dir(path).map_err(|source| GeonamesDownloadError::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;
        let connection =
            Connection::open(path).map_err(|source| GeonamesDownloadError::InitialiseLog {
                path: path.to_path_buf(),
                source,
            })?;
        connection
            .execute(
                "CREATE TABLE IF NOT EXISTS downloads (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    file_name TEXT NOT NULL,
                    url TEXT NOT NULL,
                    size_bytes INTEGER NOT NULL,
                    bytes_written INTEGER NOT NULL,
                    output_path TEXT NOT NULL,
                    text_path TEXT NOT NULL,
                    cached INTEGER NOT NULL,
                    downloaded_at INTEGER NOT NULL
                )",
                [],
            )
            .map_err(|source| GeonamesDownloadError::InitialiseLog {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            connection,
            location: path.to_path_buf(),
        })
    }

    /// Record a completed download in the log.
    ///
    /// # Errors
    ///
    /// Returns [`GeonamesDownloadError`] when a value cannot be converted or
    /// the insert fails.
    pub fn record(&self, report: &DownloadReport) -> Result<(), GeonamesDownloadError> {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|err| GeonamesDownloadError::RecordLogValue {
                what: "timestamp",
                source: Box::new(err),
            })?;
        let timestamp = sqlite_integer("timestamp", duration.as_secs())?;
        let size = sqlite_integer("size", report.size_bytes)?;
        let bytes = sqlite_integer("bytes written", report.bytes_written)?;
        self.connection
            .execute(
                "INSERT INTO downloads (
                    file_name,
                    url,
                    size_bytes,
                    bytes_written,
                    output_path,
                    text_path,
                    cached,
                    downloaded_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    &report.file_name,
                    &report.url,
                    size,
                    bytes,
                    report.output_path.as_str(),
                    report.text_path.as_str(),
                    report.cached,
                    timestamp
                ],
            )
            .map_err(|source| GeonamesDownloadError::RecordLogSql { source })?;
        Ok(())
    }

    /// Location of the underlying SQLite database.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.location
    }

    #[cfg(test)]
    pub(crate) const fn connection(&self) -> &Connection {
        &self.connection
    }
}

fn sqlite_integer(what: &'static str, value: u64) -> Result<i64, GeonamesDownloadError> {
    i64::try_from(value).map_err(|err| GeonamesDownloadError::RecordLogValue {
        what,
        source: Box::new(err),
    })
}
