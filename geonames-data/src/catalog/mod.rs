//! Catalog of the GeoNames export files this crate understands.
//!
//! Each [`CatalogEntry`] ties a dump file name to its [`DatasetKind`], which
//! in turn names the schema, storage table, transforms and dependencies used
//! to import it.
#![forbid(unsafe_code)]

mod order;
mod plan;

use std::fmt;

use geonames_core::RecordSchema;
use serde::Serialize;
use thiserror::Error;

use crate::datasets;
use crate::transform::RecordTransform;

pub use order::{OrderError, order_jobs};
pub use plan::{ImportJob, PlanError, plan_imports};

/// The dataset variants with a schema and a storage table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Feature class and code descriptions.
    FeatureCode,
    /// Time zone offsets.
    Timezone,
    /// Country metadata.
    CountryInfo,
    /// Geographic points; the primary dataset.
    Geoname,
    /// Parent/child relations between geonames.
    Hierarchy,
    /// Alternate and localised names.
    AlternateName,
}

impl DatasetKind {
    /// Every kind in dependency-respecting declaration order.
    pub const ALL: [Self; 6] = [
        Self::FeatureCode,
        Self::Timezone,
        Self::CountryInfo,
        Self::Geoname,
        Self::Hierarchy,
        Self::AlternateName,
    ];

    /// Schema used to decode files of this kind.
    #[must_use]
    pub fn schema(self) -> &'static RecordSchema {
        match self {
            Self::FeatureCode => datasets::feature_code(),
            Self::Timezone => datasets::timezone(),
            Self::CountryInfo => datasets::country_info(),
            Self::Geoname => datasets::geoname(),
            Self::Hierarchy => datasets::hierarchy(),
            Self::AlternateName => datasets::alternate_name(),
        }
    }

    /// Storage table receiving records of this kind.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::FeatureCode => "geonamefeature",
            Self::Timezone => "geonametimezone",
            Self::CountryInfo => "geonamecountry",
            Self::Geoname => "geoname",
            Self::Hierarchy => "geonamehierarchy",
            Self::AlternateName => "geonamealternatename",
        }
    }

    /// Transforms applied to each record before storage.
    #[must_use]
    pub const fn transforms(self) -> &'static [RecordTransform] {
        match self {
            Self::Geoname => &[
                RecordTransform::GeoPoint,
                RecordTransform::ClearEmptyForeignKeys,
            ],
            Self::FeatureCode
            | Self::Timezone
            | Self::CountryInfo
            | Self::Hierarchy
            | Self::AlternateName => &[],
        }
    }

    /// Kinds that must be imported before this one.
    #[must_use]
    pub const fn dependencies(self) -> &'static [Self] {
        match self {
            Self::Geoname => &[Self::FeatureCode, Self::Timezone, Self::CountryInfo],
            Self::Hierarchy | Self::AlternateName => &[Self::Geoname],
            Self::FeatureCode | Self::Timezone | Self::CountryInfo => &[],
        }
    }

    /// Short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FeatureCode => "feature code",
            Self::Timezone => "timezone",
            Self::CountryInfo => "country info",
            Self::Geoname => "geoname",
            Self::Hierarchy => "hierarchy",
            Self::AlternateName => "alternate name",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a file is published on the download server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// Served as the text file itself.
    Plain,
    /// Served as `<stem>.zip` containing the text file.
    Zip,
}

/// One importable GeoNames export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Name of the extracted text file.
    pub file_name: &'static str,
    /// Dataset the file belongs to.
    pub kind: DatasetKind,
    /// Publication format.
    pub archive: ArchiveFormat,
    /// Whether this is one of the mutually exclusive primary extracts.
    pub primary: bool,
    /// Language of a localised file.
    pub language: Option<&'static str>,
}

impl CatalogEntry {
    const fn plain(file_name: &'static str, kind: DatasetKind) -> Self {
        Self {
            file_name,
            kind,
            archive: ArchiveFormat::Plain,
            primary: false,
            language: None,
        }
    }

    const fn zipped(file_name: &'static str, kind: DatasetKind) -> Self {
        Self {
            archive: ArchiveFormat::Zip,
            ..Self::plain(file_name, kind)
        }
    }

    const fn primary(file_name: &'static str) -> Self {
        Self {
            primary: true,
            ..Self::zipped(file_name, DatasetKind::Geoname)
        }
    }

    const fn feature_codes(file_name: &'static str, language: &'static str) -> Self {
        Self {
            language: Some(language),
            ..Self::plain(file_name, DatasetKind::FeatureCode)
        }
    }

    /// Name of the file published on the download server.
    ///
    /// # Examples
    ///
    /// ```
    /// use geonames_data::catalog::lookup;
    ///
    /// let entry = lookup("cities1000.txt").expect("catalogued");
    /// assert_eq!(entry.archive_name(), "cities1000.zip");
    /// ```
    #[must_use]
    pub fn archive_name(&self) -> String {
        match self.archive {
            ArchiveFormat::Plain => self.file_name.to_owned(),
            ArchiveFormat::Zip => {
                let stem = self
                    .file_name
                    .strip_suffix(".txt")
                    .unwrap_or(self.file_name);
                format!("{stem}.zip")
            }
        }
    }
}

/// Every supported export file.
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry::primary("allCountries.txt"),
    CatalogEntry::primary("cities1000.txt"),
    CatalogEntry::primary("cities5000.txt"),
    CatalogEntry::primary("cities15000.txt"),
    CatalogEntry::plain("countryInfo.txt", DatasetKind::CountryInfo),
    CatalogEntry::plain("timeZones.txt", DatasetKind::Timezone),
    CatalogEntry::feature_codes("featureCodes_bg.txt", "bg"),
    CatalogEntry::feature_codes("featureCodes_en.txt", "en"),
    CatalogEntry::feature_codes("featureCodes_nb.txt", "nb"),
    CatalogEntry::feature_codes("featureCodes_nn.txt", "nn"),
    CatalogEntry::feature_codes("featureCodes_no.txt", "no"),
    CatalogEntry::feature_codes("featureCodes_ru.txt", "ru"),
    CatalogEntry::feature_codes("featureCodes_sv.txt", "sv"),
    CatalogEntry::zipped("hierarchy.txt", DatasetKind::Hierarchy),
    CatalogEntry::zipped("alternateNames.txt", DatasetKind::AlternateName),
];

/// Default primary extract.
pub const DEFAULT_PRIMARY: &str = "cities1000.txt";

/// Default feature-code language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Find the catalog entry for an extracted file name.
#[must_use]
pub fn lookup(file_name: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.file_name == file_name)
}

/// File names of the primary extracts.
pub fn primary_file_names() -> impl Iterator<Item = &'static str> {
    CATALOG
        .iter()
        .filter(|entry| entry.primary)
        .map(|entry| entry.file_name)
}

/// Languages with a feature-code file, sorted and deduplicated.
#[must_use]
pub fn languages() -> Vec<&'static str> {
    let mut found: Vec<&'static str> = CATALOG.iter().filter_map(|entry| entry.language).collect();
    found.sort_unstable();
    found.dedup();
    found
}

/// Errors raised when selecting files to download.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The requested primary extract is not catalogued.
    #[error("unknown primary file {name}; expected one of {choices}")]
    UnknownPrimary {
        /// Requested file name.
        name: String,
        /// Comma-separated valid choices.
        choices: String,
    },
    /// No feature-code file exists for the requested language.
    #[error("unknown language {code}; expected one of {choices}")]
    UnknownLanguage {
        /// Requested language code.
        code: String,
        /// Comma-separated valid choices.
        choices: String,
    },
}

/// Entries to fetch for one primary extract and one language.
///
/// Every catalogued file is selected except the other primary extracts and
/// the feature-code files of other languages.
///
/// # Errors
///
/// Returns [`CatalogError`] when `primary` or `language` is unknown.
///
/// # Examples
///
/// ```
/// use geonames_data::catalog::download_selection;
///
/// let files: Vec<_> = download_selection("cities5000.txt", "nb")?
///     .iter()
///     .map(|entry| entry.file_name)
///     .collect();
/// assert!(files.contains(&"cities5000.txt"));
/// assert!(files.contains(&"featureCodes_nb.txt"));
/// assert!(!files.contains(&"allCountries.txt"));
/// # Ok::<(), geonames_data::catalog::CatalogError>(())
/// ```
pub fn download_selection(
    primary: &str,
    language: &str,
) -> Result<Vec<&'static CatalogEntry>, CatalogError> {
    if !primary_file_names().any(|name| name == primary) {
        return Err(CatalogError::UnknownPrimary {
            name: primary.to_owned(),
            choices: primary_file_names().collect::<Vec<_>>().join(", "),
        });
    }
    let known = languages();
    if !known.contains(&language) {
        return Err(CatalogError::UnknownLanguage {
            code: language.to_owned(),
            choices: known.join(", "),
        });
    }
    Ok(CATALOG
        .iter()
        .filter(|entry| !entry.primary || entry.file_name == primary)
        .filter(|entry| entry.language.is_none_or(|code| code == language))
        .collect())
}
