use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::USER_AGENT;
use reqwest::{Client, Response};
use std::io::{self, Write};
use std::pin::pin;
use std::time::Duration;

use super::util::sanitise_base_url;
use super::{BaseUrl, TransportError};

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "geonames-import/0.1";

/// Public GeoNames dump mirror.
pub const DEFAULT_BASE_URL: &str = "https://download.geonames.org/export/dump";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Origin of GeoNames export files.
#[async_trait(?Send)]
pub trait GeonamesSource {
    /// Base URL archive names are resolved against.
    fn base_url(&self) -> &BaseUrl;
    /// Stream the file at `url` into `sink`, returning the bytes written.
    async fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64, TransportError>;
}

/// HTTP implementation of [`GeonamesSource`].
#[derive(Debug)]
pub struct HttpGeonamesSource {
    client: Client,
    base_url: BaseUrl,
    user_agent: String,
}

impl HttpGeonamesSource {
    /// Construct an HTTP-backed source; an empty `base_url` selects
    /// [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Client`] when the TLS backend cannot be
    /// initialised.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|err| TransportError::Client {
                message: err.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: sanitise_base_url(base_url),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        })
    }

    /// Override the default user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    async fn call(&self, url: &str) -> Result<Response, TransportError> {
        self.client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await
            .map_err(|err| convert_reqwest_error(err, url))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(err, url))
    }
}

#[async_trait(?Send)]
impl GeonamesSource for HttpGeonamesSource {
    fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    async fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64, TransportError> {
        let mut body = pin!(self.call(url).await?.bytes_stream());
        let mut written: u64 = 0;
        while let Some(chunk) = body.next().await {
            let bytes = chunk.map_err(|err| convert_reqwest_error(err, url))?;
            sink.write_all(&bytes)
                .map_err(|source| TransportError::Sink {
                    url: url.to_owned(),
                    source,
                })?;
            written = written.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
        }
        Ok(written)
    }
}

fn convert_reqwest_error(error: reqwest::Error, url: &str) -> TransportError {
    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    let kind = if error.is_timeout() {
        io::ErrorKind::TimedOut
    } else {
        io::ErrorKind::Other
    };
    TransportError::Network {
        url: url.to_owned(),
        source: io::Error::new(kind, error),
    }
}
