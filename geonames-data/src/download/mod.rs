//! Fetching GeoNames export files from the public dump mirror.
//!
//! [`download_entries`] resolves each [`CatalogEntry`](crate::catalog::CatalogEntry)
//! to its published archive, streams it into the output directory and
//! optionally records the transfer in a [`DownloadLog`]. Zipped entries are
//! kept and their text file is extracted beside them with [`extract_member`],
//! so the directory can be handed straight to the importer.
#![forbid(unsafe_code)]

mod error;
mod extract;
mod log;
mod ops;
mod source;
mod types;
mod util;

#[cfg(test)]
mod test_support;

pub use error::{GeonamesDownloadError, TransportError};
pub use extract::extract_member;
pub use log::DownloadLog;
pub use ops::{download_entries, download_entry, entry_url};
pub use source::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, GeonamesSource, HttpGeonamesSource};
pub use types::{BaseUrl, DownloadOptions, DownloadReport};
