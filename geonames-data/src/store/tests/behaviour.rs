//! Behavioural tests for importing dump files using rstest-bdd.

use super::super::{GeonamesStore, ImportError, ImportReport, Importer};
use super::{COUNTRIES, FEATURES, GEONAMES, TIMEZONES};
use crate::catalog::{DatasetKind, plan_imports};
use camino::Utf8PathBuf;
use geonames_core::test_support::RecordingSink;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tempfile::TempDir;

struct ImportContext {
    _dir: TempDir,
    root: Utf8PathBuf,
    files: RefCell<Vec<Utf8PathBuf>>,
    outcome: RefCell<Option<Result<Vec<ImportReport>, ImportError>>>,
}

impl ImportContext {
    fn database(&self) -> Utf8PathBuf {
        self.root.join("db/geonames.db")
    }
}

#[fixture]
fn import_context() -> ImportContext {
    let dir = TempDir::new().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
    ImportContext {
        _dir: dir,
        root,
        files: RefCell::new(Vec::new()),
        outcome: RefCell::new(None),
    }
}

fn fixture_text(name: &str) -> &'static str {
    match name {
        "cities1000.txt" => GEONAMES,
        "featureCodes_en.txt" => FEATURES,
        "timeZones.txt" => TIMEZONES,
        "countryInfo.txt" => COUNTRIES,
        other => panic!("no fixture for {other}"),
    }
}

#[given("the dump file {name}")]
fn dump_file(#[from(import_context)] ctx: &ImportContext, name: String) {
    let path = ctx.root.join(&name);
    std::fs::write(&path, fixture_text(&name)).expect("write dump file");
    ctx.files.borrow_mut().push(path);
}

#[when("I import every dump file")]
fn import_files(#[from(import_context)] ctx: &ImportContext) {
    let files = ctx.files.borrow();
    let jobs = plan_imports(files.as_slice()).expect("plan imports");
    let mut store = GeonamesStore::open(&ctx.database()).expect("open store");
    let sink = RecordingSink::new();
    let outcome = Importer::new(&mut store, &sink).run_all(&jobs);
    *ctx.outcome.borrow_mut() = Some(outcome);
}

#[then("{count} files are reported")]
fn files_reported(#[from(import_context)] ctx: &ImportContext, count: usize) {
    let outcome = ctx.outcome.borrow();
    match outcome.as_ref() {
        Some(Ok(reports)) => assert_eq!(reports.len(), count),
        Some(Err(err)) => panic!("expected success, got error: {err}"),
        None => panic!("import must run first"),
    }
}

#[then("{count} geoname rows are stored")]
fn geoname_rows(#[from(import_context)] ctx: &ImportContext, count: u64) {
    let store = GeonamesStore::open(&ctx.database()).expect("reopen store");
    assert_eq!(store.count(DatasetKind::Geoname).expect("count"), count);
}

#[then("geoname rows are imported last")]
fn geonames_last(#[from(import_context)] ctx: &ImportContext) {
    let outcome = ctx.outcome.borrow();
    let last = outcome
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .and_then(|reports| reports.last())
        .unwrap_or_else(|| panic!("a successful import must be recorded"));
    assert_eq!(last.kind, DatasetKind::Geoname);
}

#[then("the import fails while writing geoname records")]
fn write_failure(#[from(import_context)] ctx: &ImportContext) {
    let outcome = ctx.outcome.borrow();
    match outcome.as_ref() {
        Some(Err(ImportError::Write { kind, .. })) => assert_eq!(*kind, DatasetKind::Geoname),
        other => panic!("expected a write failure, got {other:?}"),
    }
}

#[scenario(path = "tests/features/import_dumps.feature", index = 0)]
fn importing_reference_data_first(#[from(import_context)] context: ImportContext) {
    let _ = context;
}

#[scenario(path = "tests/features/import_dumps.feature", index = 1)]
fn rejecting_geonames_without_references(#[from(import_context)] context: ImportContext) {
    let _ = context;
}
