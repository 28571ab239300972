//! Command-line interface for importing GeoNames dumps.
//!
//! Two subcommands are provided:
//!
//! - `import` decodes extracted dump files and stores them in SQLite, reference
//!   tables first.
//! - `download` fetches the archives for one primary extract and language.
//!
//! Options are layered from configuration files, `GEONAMES_*` environment
//! variables and CLI flags via `ortho_config`.
#![forbid(unsafe_code)]

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::EnvFilter;

mod download;
mod error;
mod import;

pub use error::CliError;

use download::{DownloadArgs, run_download};
use import::{ImportArgs, run_import};

const ARG_IMPORT_FILES: &str = "files";
const ARG_IMPORT_DATABASE: &str = "database";
const ARG_IMPORT_BATCH_SIZE: &str = "batch-size";
const ARG_IMPORT_KEEP_EXISTING_DATA: &str = "keep-existing-data";
const ARG_IMPORT_RECREATE_TABLES: &str = "recreate-tables";
const ENV_IMPORT_FILES: &str = "GEONAMES_CMDS_IMPORT_FILES";

const ARG_DOWNLOAD_PRIMARY: &str = "primary";
const ARG_DOWNLOAD_LANGUAGE: &str = "language";
const ARG_DOWNLOAD_DIR: &str = "download-dir";
const ARG_DOWNLOAD_USE_CACHE: &str = "use-cache";
const ARG_DOWNLOAD_BASE_URL: &str = "base-url";
const ARG_DOWNLOAD_METADATA: &str = "metadata";

const ENV_LOG: &str = "GEONAMES_LOG";

/// Run the GeoNames CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when parsing, configuration, or the selected command
/// fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.verbose)?;
    match cli.command {
        Command::Import(args) => run_import(args),
        Command::Download(args) => run_download(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "geonames",
    about = "Download GeoNames dumps and import them into SQLite",
    version
)]
struct Cli {
    /// Increase log verbosity (repeat for more detail).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import extracted dump files into a SQLite database.
    Import(ImportArgs),
    /// Download the dump archives for a primary extract.
    Download(DownloadArgs),
}

const fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbose: u8) -> Result<(), CliError> {
    let filter =
        EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(CliError::InitLogging)
}

fn write_report<T: Serialize + ?Sized>(writer: &mut dyn Write, report: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerialiseReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
