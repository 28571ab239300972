//! Shared fixtures for download tests.
use std::collections::HashMap;
use std::future::Future;
use std::io::{Cursor, Write};

use async_trait::async_trait;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::{BaseUrl, GeonamesSource, TransportError};

/// Stub [`GeonamesSource`] serving in-memory files keyed by URL.
#[derive(Debug, Clone)]
pub struct StubSource {
    base_url: BaseUrl,
    files: HashMap<String, Vec<u8>>,
}

impl StubSource {
    /// Construct an empty stub rooted at `https://example.org/dump`.
    pub fn new() -> Self {
        Self {
            base_url: BaseUrl::from("https://example.org/dump"),
            files: HashMap::new(),
        }
    }

    /// Serve `body` for the archive `name` below the base URL.
    pub fn with_file(mut self, name: &str, body: &[u8]) -> Self {
        self.files
            .insert(format!("{}/{name}", self.base_url), body.to_vec());
        self
    }
}

#[async_trait(?Send)]
impl GeonamesSource for StubSource {
    fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    async fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64, TransportError> {
        let body = self.files.get(url).ok_or_else(|| TransportError::Http {
            url: url.to_owned(),
            status: 404,
            message: "not found".to_owned(),
        })?;
        sink.write_all(body).map_err(|source| TransportError::Sink {
            url: url.to_owned(),
            source,
        })?;
        Ok(u64::try_from(body.len()).expect("body length should fit in u64"))
    }
}

/// Drive `future` to completion on a current-thread runtime.
pub fn block_on_for_tests<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("create Tokio runtime")
        .block_on(future)
}

/// Build an in-memory zip archive holding `members`.
pub fn zip_archive(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in members {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start zip member");
        writer.write_all(body).expect("write zip member");
    }
    writer.finish().expect("finish zip archive").into_inner()
}
