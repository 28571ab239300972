//! Import command implementation for the GeoNames CLI.

use std::io::Write;
use std::num::NonZeroUsize;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use geonames_core::LogSink;
use geonames_data::catalog::{DatasetKind, plan_imports};
use geonames_data::store::{
    DEFAULT_BATCH_SIZE, GeonamesStore, ImportOptions, ImportReport, Importer,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_IMPORT_BATCH_SIZE, ARG_IMPORT_DATABASE, ARG_IMPORT_FILES, ARG_IMPORT_KEEP_EXISTING_DATA,
    ARG_IMPORT_RECREATE_TABLES, CliError, ENV_IMPORT_FILES, write_report,
};

const DEFAULT_DATABASE: &str = "geonames.db";

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "import",
    long_about = "Import extracted GeoNames dump files into SQLite. Files are \
                 matched to datasets by name and imported so that reference \
                 tables are filled before the rows that point at them.",
    about = "Import extracted GeoNames dump files"
)]
#[ortho_config(prefix = "GEONAMES")]
pub(crate) struct ImportArgs {
    /// Extracted dump files, e.g. `cities1000.txt countryInfo.txt`.
    #[arg(value_name = "file")]
    #[serde(default)]
    pub(crate) files: Vec<Utf8PathBuf>,
    /// SQLite database to import into.
    #[arg(long = ARG_IMPORT_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Records written per transaction.
    #[arg(long = ARG_IMPORT_BATCH_SIZE, value_name = "n")]
    #[serde(default)]
    pub(crate) batch_size: Option<NonZeroUsize>,
    /// Keep stored rows instead of purging every GeoNames table first.
    #[arg(
        long = ARG_IMPORT_KEEP_EXISTING_DATA,
        value_name = "bool",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) keep_existing_data: Option<bool>,
    /// Drop and recreate every GeoNames table before importing.
    #[arg(
        long = ARG_IMPORT_RECREATE_TABLES,
        value_name = "bool",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) recreate_tables: Option<bool>,
}

impl ImportArgs {
    pub(crate) fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportConfig::try_from(merged)
    }
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    /// Dump files in the order given.
    pub(crate) files: Vec<Utf8PathBuf>,
    /// Target database.
    pub(crate) database: Utf8PathBuf,
    /// Records per batch.
    pub(crate) batch_size: NonZeroUsize,
    /// Skip purging stored rows first.
    pub(crate) keep_existing_data: bool,
    /// Rebuild the schema before importing.
    pub(crate) recreate_tables: bool,
}

impl ImportConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        self.files
            .iter()
            .try_for_each(|path| require_existing(path, ARG_IMPORT_FILES))
    }
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        if args.files.is_empty() {
            return Err(CliError::MissingArgument {
                field: ARG_IMPORT_FILES,
                env: ENV_IMPORT_FILES,
            });
        }
        let keep_existing_data = args.keep_existing_data.unwrap_or(false);
        let recreate_tables = args.recreate_tables.unwrap_or(false);
        if keep_existing_data && recreate_tables {
            return Err(CliError::ConflictingOptions {
                first: ARG_IMPORT_KEEP_EXISTING_DATA,
                second: ARG_IMPORT_RECREATE_TABLES,
            });
        }
        Ok(Self {
            files: args.files,
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            batch_size: args.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            keep_existing_data,
            recreate_tables,
        })
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match geonames_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) if path.exists() => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_import_with(args, &mut stdout)
}

pub(crate) fn run_import_with(args: ImportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_import_config(args)?;
    let reports = execute_import(&config)?;
    write_report(writer, reports.as_slice())
}

pub(crate) fn resolve_import_config(args: ImportArgs) -> Result<ImportConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn execute_import(config: &ImportConfig) -> Result<Vec<ImportReport>, CliError> {
    let jobs = plan_imports(config.files.as_slice())
        .map_err(|err| CliError::PlanImports(Box::new(err)))?;
    let mut store = open_store(config)?;

    let options = ImportOptions {
        batch_size: config.batch_size,
    };
    Importer::new(&mut store, &LogSink)
        .with_options(options)
        .run_all(&jobs)
        .map_err(|err| CliError::Import(Box::new(err)))
}

fn open_store(config: &ImportConfig) -> Result<GeonamesStore, CliError> {
    let opened = if config.recreate_tables {
        log::info!("Recreating tables in {}", config.database);
        GeonamesStore::open_recreated(&config.database)
    } else {
        GeonamesStore::open(&config.database)
    };
    let mut store = opened.map_err(|source| CliError::OpenStore {
        path: config.database.clone(),
        source: Box::new(source),
    })?;
    if !config.recreate_tables && !config.keep_existing_data {
        store
            .purge(&DatasetKind::ALL)
            .map_err(|source| CliError::PrepareTables {
                path: config.database.clone(),
                source: Box::new(source),
            })?;
    }
    Ok(store)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ImportConfig, CliError> {
    let merged = ImportArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ImportConfig::try_from(merged)
}
