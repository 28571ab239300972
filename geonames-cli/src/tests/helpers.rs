//! Test helpers for writing dump fixtures and inspecting the resulting database.

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::Connection;
use tempfile::TempDir;

pub(super) const FEATURES: &str = "P.PPLC\tcapital of a political entity\t\n\
    A.ADM1\tfirst-order administrative division\ta primary administrative division\n";
pub(super) const TIMEZONES: &str = "CountryCode\tTimeZoneId\tGMT offset\tDST offset\trawOffset\n\
    NO\tEurope/Oslo\t1.0\t2.0\t1.0\n";
pub(super) const COUNTRIES: &str = "#ISO\tISO3\n\
    NO\tNOR\t578\tNO\tNorway\tOslo\t324220\t5314336\tEU\t.no\tNOK\tKrone\t47\t####\t^(\\d{4})$\tno,nb,nn\t3144096\tSE,FI,RU\t\n";
pub(super) const CITIES: &str = "3143244\tOslo\tOslo\tOslo,Christiania\t59.91273\t10.74609\tP\tPPLC\tNO\t\t12\t0301\t\t\t580000\t\t26\tEurope/Oslo\t2022-03-09\n";

/// A temporary directory holding one extracted copy of each reference dump
/// and a small primary extract.
pub(super) struct DumpFiles {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl DumpFiles {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        for (name, body) in [
            ("featureCodes_en.txt", FEATURES),
            ("timeZones.txt", TIMEZONES),
            ("countryInfo.txt", COUNTRIES),
            ("cities1000.txt", CITIES),
        ] {
            write_utf8(&root.join(name), body.as_bytes());
        }
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Every fixture, primary extract first.
    pub(super) fn all(&self) -> Vec<Utf8PathBuf> {
        [
            "cities1000.txt",
            "countryInfo.txt",
            "timeZones.txt",
            "featureCodes_en.txt",
        ]
        .into_iter()
        .map(|name| self.root.join(name))
        .collect()
    }

    pub(super) fn database(&self) -> Utf8PathBuf {
        self.root.join("db").join("geonames.db")
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write fixture file");
}

pub(super) fn count_rows(database: &Utf8Path, table: &str) -> i64 {
    let connection = Connection::open(database.as_std_path()).expect("open database");
    connection
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .expect("count rows")
}
