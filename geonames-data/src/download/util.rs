//! Shared helpers used across download operations and sources.

use super::BaseUrl;
use super::source::DEFAULT_BASE_URL;

/// Trim trailing slashes and fall back to the public GeoNames mirror.
pub(crate) fn sanitise_base_url(url: impl Into<String>) -> BaseUrl {
    let raw = url.into();
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        BaseUrl::from(DEFAULT_BASE_URL)
    } else {
        BaseUrl::new(trimmed.to_owned())
    }
}

/// Suffix of an archive while it is still being written.
pub(crate) const PARTIAL_SUFFIX: &str = ".part";
