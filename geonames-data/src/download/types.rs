//! Domain wrappers for the GeoNames dump endpoint and download outcomes.

use std::{fmt, ops::Deref};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use super::log::DownloadLog;

/// Base URL of the GeoNames dump mirror.
///
/// # Examples
/// ```
/// # use geonames_data::download::BaseUrl;
/// let url = BaseUrl::new("https://download.geonames.org/export/dump");
/// assert_eq!(url.as_ref(), "https://download.geonames.org/export/dump");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Construct a new [`BaseUrl`] from an owned or borrowed string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Consume the wrapper and return the inner [`String`].
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for BaseUrl {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for BaseUrl {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Summary of one fetched (or reused) archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadReport {
    /// Name of the archive on the server.
    pub file_name: String,
    /// URL the archive was fetched from.
    pub url: String,
    /// Bytes transferred; zero for cached files.
    pub bytes_written: u64,
    /// Size of the file on disk.
    pub size_bytes: u64,
    /// Location of the archive on disk.
    pub output_path: Utf8PathBuf,
    /// Location of the text file ready for import; differs from
    /// `output_path` once a zip archive has been extracted.
    pub text_path: Utf8PathBuf,
    /// Whether an existing file was reused.
    pub cached: bool,
}

/// Options controlling where and how archives are written.
///
/// # Examples
/// ```
/// # use camino::Utf8Path;
/// # use geonames_data::download::DownloadOptions;
/// let options = DownloadOptions::new(Utf8Path::new("geonames-data")).with_cache(true);
/// assert!(options.use_cache);
/// assert!(options.log.is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DownloadOptions<'a> {
    /// Directory receiving the archives.
    pub output_dir: &'a Utf8Path,
    /// Optional audit log for completed transfers.
    pub log: Option<&'a DownloadLog>,
    /// Reuse archives that already exist in `output_dir`.
    pub use_cache: bool,
}

impl<'a> DownloadOptions<'a> {
    /// Create options writing into `output_dir` without logging or caching.
    #[must_use]
    pub const fn new(output_dir: &'a Utf8Path) -> Self {
        Self {
            output_dir,
            log: None,
            use_cache: false,
        }
    }

    /// Record completed transfers in `log`.
    #[must_use]
    pub const fn with_log(mut self, log: &'a DownloadLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Enable or disable reuse of existing archives.
    #[must_use]
    pub const fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }
}
