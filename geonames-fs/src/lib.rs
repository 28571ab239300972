//! Capability-based file helpers shared by the GeoNames crates.
//!
//! Every helper resolves an ambient base directory with `cap-std` and then
//! works relative to it, so callers can pass absolute or relative
//! `camino` paths alike.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, BufReader, BufWriter};
use std::path::Component;

/// Buffered reader over a dump file.
pub type DumpReader = BufReader<fs_utf8::File>;

/// Buffered writer for a downloaded dump.
pub type DumpWriter = BufWriter<fs_utf8::File>;

/// Open `path` for buffered, line-oriented reading.
///
/// # Errors
///
/// Propagates any failure to open the file.
pub fn open_buffered(path: &Utf8Path) -> io::Result<DumpReader> {
    fs_utf8::File::open_ambient(path, ambient_authority()).map(BufReader::new)
}

/// Create or truncate `path`, creating its parent directory first.
///
/// # Errors
///
/// Propagates failures creating the directory or the file.
pub fn create_buffered(path: &Utf8Path) -> io::Result<DumpWriter> {
    ensure_parent_dir(path)?;
    let (dir, name) = parent_dir_and_name(path)?;
    dir.create(name.as_str()).map(BufWriter::new)
}

/// Ensure the parent directory of `path` exists.
///
/// # Errors
///
/// Propagates failures resolving or creating the directory.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Ensure `dir` exists, creating intermediate directories as needed.
///
/// # Errors
///
/// Propagates failures resolving or creating the directory.
pub fn ensure_dir(dir: &Utf8Path) -> io::Result<()> {
    let (base, relative) = split_ambient(dir)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

/// Report whether `path` names an existing regular file.
///
/// A missing parent directory reads as "not a file" rather than an error.
///
/// # Errors
///
/// Propagates metadata failures other than `NotFound`.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match parent_dir_and_name(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Open `path` for unbuffered random access, as archive readers need.
///
/// # Errors
///
/// Propagates any failure to open the file.
pub fn open_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Remove the file at `path`; a missing file is not an error.
///
/// # Errors
///
/// Propagates failures other than `NotFound`.
pub fn remove_file(path: &Utf8Path) -> io::Result<()> {
    let (dir, name) = match parent_dir_and_name(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    match dir.remove_file(name.as_str()) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        outcome => outcome,
    }
}

/// Size in bytes of the file at `path`.
///
/// # Errors
///
/// Propagates failures resolving the file's metadata.
pub fn file_len(path: &Utf8Path) -> io::Result<u64> {
    let (dir, name) = parent_dir_and_name(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.len())
}

/// Atomically replace `to` with `from`.
///
/// Both paths must share a filesystem; the rename is performed relative to
/// their parent directories.
///
/// # Errors
///
/// Propagates failures opening either directory or renaming the file.
pub fn rename_file(from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
    let (from_dir, from_name) = parent_dir_and_name(from)?;
    let (to_dir, to_name) = parent_dir_and_name(to)?;
    from_dir.rename(from_name.as_str(), &to_dir, to_name.as_str())
}

fn parent_dir_and_name(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

// Splits into an ambient root (drive prefix, `/` or `.`) and the path below it.
fn split_ambient(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();
    let base = match std_path.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR_STR)
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => Utf8PathBuf::from("."),
    };
    let relative = if base.as_str() == "." {
        path.to_path_buf()
    } else {
        path.strip_prefix(&base)
            .map_err(|_| io::Error::other(format!("cannot split {path} below {base}")))?
            .to_path_buf()
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::io::{BufRead, Write};
    use tempfile::TempDir;

    #[fixture]
    fn workspace() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
        (dir, root)
    }

    #[rstest]
    fn create_then_read_back(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        let path = root.join("nested/dir/timeZones.txt");

        let mut writer = create_buffered(&path).expect("create file");
        writer.write_all(b"CountryCode\tTimeZoneId\nNO\tEurope/Oslo\n").expect("write");
        writer.flush().expect("flush");
        drop(writer);

        let lines: Vec<String> = open_buffered(&path)
            .expect("open file")
            .lines()
            .collect::<Result<_, _>>()
            .expect("read lines");
        assert_eq!(lines, ["CountryCode\tTimeZoneId", "NO\tEurope/Oslo"]);
        assert!(file_is_file(&path).expect("stat file"));
    }

    #[rstest]
    fn renames_report_the_final_length(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        let partial = root.join("hierarchy.zip.part");
        let done = root.join("hierarchy.zip");

        let mut writer = create_buffered(&partial).expect("create file");
        writer.write_all(b"PK\x03\x04").expect("write");
        writer.flush().expect("flush");
        drop(writer);
        rename_file(&partial, &done).expect("rename");

        assert!(!file_is_file(&partial).expect("stat partial"));
        assert_eq!(file_len(&done).expect("stat final"), 4);
    }

    #[rstest]
    fn removes_files_and_ignores_missing_ones(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        let partial = root.join("cities1000.zip.part");
        std::fs::write(&partial, b"partial").expect("seed file");

        remove_file(&partial).expect("remove file");
        remove_file(&partial).expect("removing twice is harmless");
        remove_file(&root.join("absent/child.txt")).expect("missing parent is harmless");

        assert!(!file_is_file(&partial).expect("stat removed file"));
    }

    #[rstest]
    fn opened_files_support_seeking(workspace: (TempDir, Utf8PathBuf)) {
        use std::io::{Read, Seek, SeekFrom};

        let (_guard, root) = workspace;
        let path = root.join("hierarchy.zip");
        std::fs::write(&path, b"PK\x03\x04").expect("seed file");

        let mut file = open_file(&path).expect("open file");
        file.seek(SeekFrom::Start(2)).expect("seek");
        let mut tail = Vec::new();
        file.read_to_end(&mut tail).expect("read");
        assert_eq!(tail, b"\x03\x04");
    }

    #[rstest]
    fn directories_are_not_files(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        let dir = root.join("dumps");
        ensure_dir(&dir).expect("create dir");

        assert!(!file_is_file(&dir).expect("stat dir"));
    }

    #[rstest]
    fn missing_paths_are_not_files(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;

        assert!(!file_is_file(&root.join("absent.txt")).expect("stat missing file"));
        assert!(!file_is_file(&root.join("absent/child.txt")).expect("stat missing parent"));
    }
}
