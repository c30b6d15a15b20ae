//! Remote media access used by the share provider.

use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use mosaic_error::{HttpError, MosaicError, MosaicResult};
use reqwest::Client;
use tracing::{debug, instrument};

/// Body of a remote resource, chunk by chunk.
pub type MediaBody = BoxStream<'static, MosaicResult<Bytes>>;

/// How the share provider reaches remote media.
#[async_trait::async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Size of the remote resource from a metadata-only request.
    ///
    /// `None` when the server does not announce a length.
    async fn content_length(&self, url: &str) -> MosaicResult<Option<u64>>;

    /// Start downloading the remote resource.
    async fn fetch(&self, url: &str) -> MosaicResult<MediaBody>;
}

/// [`MediaFetcher`] on top of the shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpMediaFetcher {
    client: Client,
}

impl HttpMediaFetcher {
    /// Wrap a shared client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn status_error(status: reqwest::StatusCode, url: &str) -> HttpError {
    HttpError::with_status(status.as_u16(), format!("{} for {}", status, url))
}

#[async_trait::async_trait]
impl MediaFetcher for HttpMediaFetcher {
    #[instrument(skip(self))]
    async fn content_length(&self, url: &str) -> MosaicResult<Option<u64>> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("HEAD {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(status_error(response.status(), url).into());
        }

        // reqwest reports 0 for HEAD bodies, so read the header itself.
        let length = response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());

        debug!(?length, "Resolved remote size");
        Ok(length)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> MosaicResult<MediaBody> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("GET {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(status_error(response.status(), url).into());
        }

        let url = url.to_string();
        let body = response.bytes_stream().map(move |chunk| {
            chunk.map_err(|e| MosaicError::from(HttpError::new(format!("Reading {} failed: {}", url, e))))
        });

        Ok(body.boxed())
    }
}
