use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use url::Url;

use super::extract::{discard_partial, extract_member};
use super::source::GeonamesSource;
use super::util::PARTIAL_SUFFIX;
use super::{BaseUrl, DownloadOptions, DownloadReport, GeonamesDownloadError};
use crate::catalog::{ArchiveFormat, CatalogEntry};

/// URL of the archive publishing `entry` below `base_url`.
///
/// # Errors
///
/// Returns [`GeonamesDownloadError::InvalidUrl`] when the joined URL does not
/// parse.
///
/// # Examples
/// ```
/// # use geonames_data::catalog::lookup;
/// # use geonames_data::download::{BaseUrl, entry_url};
/// let entry = lookup("hierarchy.txt").expect("catalogued");
/// let url = entry_url(&BaseUrl::from("https://example.org/dump"), entry)?;
/// assert_eq!(url.as_str(), "https://example.org/dump/hierarchy.zip");
/// # Ok::<(), geonames_data::download::GeonamesDownloadError>(())
/// ```
pub fn entry_url(base_url: &BaseUrl, entry: &CatalogEntry) -> Result<Url, GeonamesDownloadError> {
    let file_name = entry.archive_name();
    Url::parse(&format!("{base_url}/{file_name}"))
        .map_err(|source| GeonamesDownloadError::InvalidUrl { file_name, source })
}

/// Download the archive for `entry` into `options.output_dir`.
///
/// The body is streamed into a `.part` file that is renamed into place once
/// complete, so an interrupted transfer never masquerades as a cached file;
/// the `.part` file is removed when the transfer fails. With
/// [`DownloadOptions::use_cache`] set, an existing archive is reused without
/// contacting the source. Zipped entries are then extracted next to the
/// archive and [`DownloadReport::text_path`] names the extracted file.
/// Completed transfers are recorded in [`DownloadOptions::log`] when one is
/// supplied.
///
/// # Errors
///
/// Returns [`GeonamesDownloadError`] when the URL is invalid, the transfer
/// fails, the archive cannot be written or extracted, or the log rejects
/// the record.
pub async fn download_entry<S: GeonamesSource + ?Sized>(
    source: &S,
    entry: &CatalogEntry,
    options: &DownloadOptions<'_>,
) -> Result<DownloadReport, GeonamesDownloadError> {
    let url = entry_url(source.base_url(), entry)?;
    let file_name = entry.archive_name();
    let output_path = options.output_dir.join(&file_name);

    let (cached, bytes_written, size_bytes) = if options.use_cache && is_cached(&output_path)? {
        log::info!("Using cached {output_path}");
        (true, 0, file_size(&output_path)?)
    } else {
        log::info!("Downloading {url} to {output_path}");
        let bytes_written = fetch_into(source, url.as_str(), &file_name, &output_path).await?;
        log::info!("Downloaded {bytes_written} bytes of {file_name}");
        (false, bytes_written, bytes_written)
    };
    let text_path = match entry.archive {
        ArchiveFormat::Plain => output_path.clone(),
        ArchiveFormat::Zip => extract_member(&output_path, entry.file_name, options.output_dir)?,
    };
    let report = DownloadReport {
        file_name,
        url: url.into(),
        bytes_written,
        size_bytes,
        output_path,
        text_path,
        cached,
    };

    if let Some(log) = options.log {
        log.record(&report)?;
    }
    Ok(report)
}

/// Download every entry in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first [`GeonamesDownloadError`] encountered.
pub async fn download_entries<S: GeonamesSource + ?Sized>(
    source: &S,
    entries: &[&CatalogEntry],
    options: &DownloadOptions<'_>,
) -> Result<Vec<DownloadReport>, GeonamesDownloadError> {
    let mut reports = Vec::with_capacity(entries.len());
    for entry in entries {
        reports.push(download_entry(source, entry, options).await?);
    }
    Ok(reports)
}

async fn fetch_into<S: GeonamesSource + ?Sized>(
    source: &S,
    url: &str,
    file_name: &str,
    output_path: &Utf8Path,
) -> Result<u64, GeonamesDownloadError> {
    if let Some(parent) = output_path.parent() {
        geonames_fs::ensure_dir(parent).map_err(|err| GeonamesDownloadError::CreateDir {
            path: parent.to_path_buf(),
            source: err,
        })?;
    }
    let partial = Utf8PathBuf::from(format!("{output_path}{PARTIAL_SUFFIX}"));
    let write_error = |err| GeonamesDownloadError::WriteFile {
        path: partial.clone(),
        source: err,
    };

    let mut writer = geonames_fs::create_buffered(&partial).map_err(write_error)?;
    let fetched = source.fetch(url, &mut writer).await;
    let flushed = writer.flush();
    drop(writer);
    let bytes_written = match (fetched, flushed) {
        (Ok(bytes_written), Ok(())) => bytes_written,
        (Err(err), _) => {
            discard_partial(&partial);
            return Err(GeonamesDownloadError::Download {
                file_name: file_name.to_owned(),
                source: err,
            });
        }
        (Ok(_), Err(err)) => {
            discard_partial(&partial);
            return Err(write_error(err));
        }
    };

    geonames_fs::rename_file(&partial, output_path).map_err(|err| {
        GeonamesDownloadError::WriteFile {
            path: output_path.to_path_buf(),
            source: err,
        }
    })?;
    Ok(bytes_written)
}

fn is_cached(path: &Utf8Path) -> Result<bool, GeonamesDownloadError> {
    geonames_fs::file_is_file(path).map_err(|err| GeonamesDownloadError::WriteFile {
        path: path.to_path_buf(),
        source: err,
    })
}

fn file_size(path: &Utf8Path) -> Result<u64, GeonamesDownloadError> {
    geonames_fs::file_len(path).map_err(|err| GeonamesDownloadError::WriteFile {
        path: path.to_path_buf(),
        source: err,
    })
}
