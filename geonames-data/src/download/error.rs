//! Error types produced by the GeoNames download helpers.

use std::{error::Error as StdError, io};

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors produced while downloading GeoNames export files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeonamesDownloadError {
    /// The archive URL could not be built from the base URL.
    #[error("invalid download URL for {file_name}: {source}")]
    InvalidUrl {
        /// Archive being resolved.
        file_name: String,
        /// URL parser failure.
        source: url::ParseError,
    },
    /// The archive could not be fetched.
    #[error("failed to download {file_name}: {source}")]
    Download {
        /// Archive being fetched.
        file_name: String,
        /// Transport failure.
        source: TransportError,
    },
    /// Preparing the output directory failed.
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        /// Directory being created.
        path: Utf8PathBuf,
        /// I/O failure.
        source: io::Error,
    },
    /// Writing the archive to disk failed.
    #[error("failed to write {path}: {source}")]
    WriteFile {
        /// File being written.
        path: Utf8PathBuf,
        /// I/O failure.
        source: io::Error,
    },
    /// A downloaded archive could not be opened as a zip file.
    #[error("failed to read archive {path}: {source}")]
    ReadArchive {
        /// Archive on disk.
        path: Utf8PathBuf,
        /// Archive reader failure.
        source: zip::result::ZipError,
    },
    /// A downloaded archive lacks the text file it should publish.
    #[error("archive {path} does not contain {member}")]
    MissingMember {
        /// Archive on disk.
        path: Utf8PathBuf,
        /// Expected member name.
        member: String,
    },
    /// Copying an archive member to disk failed.
    #[error("failed to extract {member} from {path}: {source}")]
    Extract {
        /// Archive on disk.
        path: Utf8PathBuf,
        /// Member being extracted.
        member: String,
        /// I/O failure while decompressing or writing.
        source: io::Error,
    },
    /// Initialising the download log failed.
    #[error("failed to initialise download log at {path}: {source}")]
    InitialiseLog {
        /// Log database path.
        path: Utf8PathBuf,
        /// SQLite failure.
        source: rusqlite::Error,
    },
    /// Recording metadata failed when interacting with SQLite.
    #[error("failed to record download metadata: {source}")]
    RecordLogSql {
        /// SQLite failure.
        source: rusqlite::Error,
    },
    /// Converting metadata into SQLite-compatible values failed.
    #[error("failed to prepare download metadata for persistence ({what}): {source}")]
    RecordLogValue {
        /// Description of the value that failed to convert.
        what: &'static str,
        /// Underlying conversion error.
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// Transport-level errors encountered while issuing HTTP requests.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    Client {
        /// Builder failure description.
        message: String,
    },
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description supplied by the server.
        message: String,
    },
    /// The request failed due to an I/O error.
    #[error("network error contacting {url}: {source}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// I/O error reported by the transport.
        source: io::Error,
    },
    /// The response body could not be written to the sink.
    #[error("failed to store response from {url}: {source}")]
    Sink {
        /// Fully qualified request URL.
        url: String,
        /// I/O error reported by the sink.
        source: io::Error,
    },
}
