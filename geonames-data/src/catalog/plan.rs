//! Mapping input paths onto ordered import jobs.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use super::{CatalogEntry, DatasetKind, OrderError, lookup, order_jobs};

/// One file to import, paired with its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportJob {
    /// Location of the extracted text file.
    pub path: Utf8PathBuf,
    /// Catalog entry matched by file name.
    pub entry: &'static CatalogEntry,
}

impl ImportJob {
    /// Dataset kind of the job.
    #[must_use]
    pub const fn kind(&self) -> DatasetKind {
        self.entry.kind
    }
}

/// Errors raised while planning imports.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// A path has no catalogued file name.
    #[error("no importer is defined for {path}")]
    UnknownFile {
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// The jobs could not be ordered.
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Match each path to the catalog and order the jobs by dependency.
///
/// # Errors
///
/// Returns [`PlanError::UnknownFile`] for an unrecognised file name.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use geonames_data::catalog::{DatasetKind, plan_imports};
///
/// let paths = [
///     Utf8PathBuf::from("dumps/cities15000.txt"),
///     Utf8PathBuf::from("dumps/countryInfo.txt"),
/// ];
/// let jobs = plan_imports(&paths)?;
/// assert_eq!(jobs[0].kind(), DatasetKind::CountryInfo);
/// assert_eq!(jobs[1].kind(), DatasetKind::Geoname);
/// # Ok::<(), geonames_data::catalog::PlanError>(())
/// ```
pub fn plan_imports<P: AsRef<Utf8Path>>(paths: &[P]) -> Result<Vec<ImportJob>, PlanError> {
    let jobs = paths
        .iter()
        .map(|candidate| {
            let path = candidate.as_ref();
            path.file_name()
                .and_then(lookup)
                .map(|entry| ImportJob {
                    path: path.to_path_buf(),
                    entry,
                })
                .ok_or_else(|| PlanError::UnknownFile {
                    path: path.to_path_buf(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(order_jobs(jobs, ImportJob::kind, DatasetKind::dependencies)?)
}
