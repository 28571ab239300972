//! Error types emitted by the GeoNames CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.
//! Library errors are boxed for that reason.

use std::sync::Arc;

use camino::Utf8PathBuf;
use geonames_data::catalog::{CatalogError, PlanError};
use geonames_data::download::{GeonamesDownloadError, TransportError};
use geonames_data::store::{ImportError, StoreError};
use thiserror::Error;

/// Errors emitted by the GeoNames CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Option name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// Two options were set that cannot be combined.
    #[error("--{first} cannot be combined with --{second}")]
    ConflictingOptions {
        /// First option name.
        first: &'static str,
        /// Second option name.
        second: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The input files could not be matched to datasets.
    #[error("failed to plan the import: {0}")]
    PlanImports(#[source] Box<PlanError>),
    /// The database could not be opened.
    #[error("failed to open database {path:?}: {source}")]
    OpenStore {
        /// Database path.
        path: Utf8PathBuf,
        /// Store failure.
        #[source]
        source: Box<StoreError>,
    },
    /// Existing tables could not be purged or recreated.
    #[error("failed to prepare tables in {path:?}: {source}")]
    PrepareTables {
        /// Database path.
        path: Utf8PathBuf,
        /// Store failure.
        #[source]
        source: Box<StoreError>,
    },
    /// Importing a dump file failed.
    #[error("import failed: {0}")]
    Import(#[source] Box<ImportError>),
    /// The requested primary extract or language is unknown.
    #[error(transparent)]
    Selection(#[from] CatalogError),
    /// The HTTP client could not be built.
    #[error("failed to build a client for {base_url:?}: {source}")]
    BuildSource {
        /// Mirror URL.
        base_url: String,
        /// Transport failure.
        #[source]
        source: TransportError,
    },
    /// The download metadata database could not be opened.
    #[error("failed to open download metadata {path:?}: {source}")]
    DownloadLog {
        /// Metadata database path.
        path: Utf8PathBuf,
        /// Download failure.
        #[source]
        source: Box<GeonamesDownloadError>,
    },
    /// The async runtime could not start.
    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Downloading an archive failed.
    #[error("download failed: {0}")]
    Download(#[source] Box<GeonamesDownloadError>),
    /// The logger could not be installed.
    #[error("failed to initialise logging: {0}")]
    InitLogging(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Serialising the command report failed.
    #[error("failed to serialise report: {0}")]
    SerialiseReport(#[source] serde_json::Error),
    /// Writing the command report failed.
    #[error("failed to write report: {0}")]
    WriteOutput(#[source] std::io::Error),
}
