//! Download command implementation for the GeoNames CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use geonames_data::catalog::{DEFAULT_LANGUAGE, DEFAULT_PRIMARY, download_selection};
use geonames_data::download::{
    DEFAULT_BASE_URL, DownloadLog, DownloadOptions, DownloadReport, GeonamesSource,
    HttpGeonamesSource, download_entries,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DOWNLOAD_BASE_URL, ARG_DOWNLOAD_DIR, ARG_DOWNLOAD_LANGUAGE, ARG_DOWNLOAD_METADATA,
    ARG_DOWNLOAD_PRIMARY, ARG_DOWNLOAD_USE_CACHE, CliError, write_report,
};

const DEFAULT_DOWNLOAD_DIR: &str = "geonames-data";

/// CLI arguments for the `download` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "download",
    long_about = "Download the GeoNames archives needed to import one primary \
                 extract: the extract itself, the shared reference files and \
                 the feature codes for one language. Zip archives are kept and \
                 their text file is extracted beside them, ready for `import`.",
    about = "Download GeoNames dump archives"
)]
#[ortho_config(prefix = "GEONAMES")]
pub(crate) struct DownloadArgs {
    /// Primary extract, e.g. `cities15000.txt` or `allCountries.txt`.
    #[arg(long = ARG_DOWNLOAD_PRIMARY, value_name = "name")]
    #[serde(default)]
    pub(crate) primary: Option<String>,
    /// Language of the feature-code names.
    #[arg(long = ARG_DOWNLOAD_LANGUAGE, value_name = "code")]
    #[serde(default)]
    pub(crate) language: Option<String>,
    /// Directory receiving the archives.
    #[arg(long = ARG_DOWNLOAD_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) download_dir: Option<Utf8PathBuf>,
    /// Reuse archives already present in the download directory.
    #[arg(
        long = ARG_DOWNLOAD_USE_CACHE,
        value_name = "bool",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) use_cache: Option<bool>,
    /// Mirror serving the dump files.
    #[arg(long = ARG_DOWNLOAD_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// SQLite database recording each download.
    #[arg(long = ARG_DOWNLOAD_METADATA, value_name = "path")]
    #[serde(default)]
    pub(crate) metadata: Option<Utf8PathBuf>,
}

impl DownloadArgs {
    pub(crate) fn into_config(self) -> Result<DownloadConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(DownloadConfig::from(merged))
    }
}

/// Resolved `download` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DownloadConfig {
    pub(crate) primary: String,
    pub(crate) language: String,
    pub(crate) download_dir: Utf8PathBuf,
    pub(crate) use_cache: bool,
    pub(crate) base_url: String,
    pub(crate) metadata: Option<Utf8PathBuf>,
}

impl From<DownloadArgs> for DownloadConfig {
    fn from(args: DownloadArgs) -> Self {
        Self {
            primary: args.primary.unwrap_or_else(|| DEFAULT_PRIMARY.to_owned()),
            language: args.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
            download_dir: args
                .download_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DOWNLOAD_DIR)),
            use_cache: args.use_cache.unwrap_or(false),
            base_url: args.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            metadata: args.metadata,
        }
    }
}

pub(crate) fn run_download(args: DownloadArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_download_with(args, &mut stdout)
}

pub(crate) fn run_download_with(
    args: DownloadArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let source = HttpGeonamesSource::new(config.base_url.clone()).map_err(|source| {
        CliError::BuildSource {
            base_url: config.base_url.clone(),
            source,
        }
    })?;
    let reports = execute_download(&config, &source)?;
    write_report(writer, reports.as_slice())
}

pub(crate) fn execute_download(
    config: &DownloadConfig,
    source: &dyn GeonamesSource,
) -> Result<Vec<DownloadReport>, CliError> {
    let entries = download_selection(&config.primary, &config.language)?;
    let log = config
        .metadata
        .as_deref()
        .map(|path| {
            DownloadLog::initialise(path).map_err(|err| CliError::DownloadLog {
                path: path.to_path_buf(),
                source: Box::new(err),
            })
        })
        .transpose()?;

    let mut options = DownloadOptions::new(&config.download_dir).with_cache(config.use_cache);
    if let Some(log_db) = log.as_ref() {
        options = options.with_log(log_db);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    runtime
        .block_on(download_entries(source, &entries, &options))
        .map_err(|err| CliError::Download(Box::new(err)))
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<DownloadConfig, CliError> {
    let merged = DownloadArgs::merge_from_layers(layers).map_err(CliError::from)?;
    Ok(DownloadConfig::from(merged))
}
