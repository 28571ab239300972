//! Unpacking the text file published inside a zipped export.

use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use zip::ZipArchive;
use zip::result::ZipError;

use super::GeonamesDownloadError;
use super::util::PARTIAL_SUFFIX;

/// Extract `member` from the zip archive at `archive` into `output_dir`.
///
/// The member is written under its own name through a `.part` file, so a
/// failed extraction never leaves a truncated text file behind. An existing
/// file of the same name is replaced.
///
/// # Errors
///
/// Returns [`GeonamesDownloadError::ReadArchive`] when the archive is not a
/// readable zip file, [`GeonamesDownloadError::MissingMember`] when it lacks
/// `member`, and [`GeonamesDownloadError::Extract`] when decompressing or
/// writing fails.
pub fn extract_member(
    archive: &Utf8Path,
    member: &str,
    output_dir: &Utf8Path,
) -> Result<Utf8PathBuf, GeonamesDownloadError> {
    let read_error = |source| GeonamesDownloadError::ReadArchive {
        path: archive.to_path_buf(),
        source,
    };
    let extract_error = |source| GeonamesDownloadError::Extract {
        path: archive.to_path_buf(),
        member: member.to_owned(),
        source,
    };

    let file = geonames_fs::open_file(archive).map_err(|err| read_error(ZipError::Io(err)))?;
    let mut zip = ZipArchive::new(file).map_err(read_error)?;
    let mut contents = match zip.by_name(member) {
        Ok(contents) => contents,
        Err(ZipError::FileNotFound) => {
            return Err(GeonamesDownloadError::MissingMember {
                path: archive.to_path_buf(),
                member: member.to_owned(),
            });
        }
        Err(err) => return Err(read_error(err)),
    };

    let output_path = output_dir.join(member);
    let partial = Utf8PathBuf::from(format!("{output_path}{PARTIAL_SUFFIX}"));
    let copied = geonames_fs::create_buffered(&partial).and_then(|mut writer| {
        let written = io::copy(&mut contents, &mut writer)?;
        writer.flush()?;
        Ok(written)
    });
    let written = match copied {
        Ok(written) => written,
        Err(err) => {
            discard_partial(&partial);
            return Err(extract_error(err));
        }
    };
    geonames_fs::rename_file(&partial, &output_path).map_err(extract_error)?;
    log::info!("Extracted {written} bytes of {member} to {output_path}");
    Ok(output_path)
}

/// Best-effort removal of an abandoned `.part` file.
pub(crate) fn discard_partial(partial: &Utf8Path) {
    if let Err(err) = geonames_fs::remove_file(partial) {
        log::warn!("Failed to remove {partial}: {err}");
    }
}
