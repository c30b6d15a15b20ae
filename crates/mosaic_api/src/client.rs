//! reqwest-backed implementation of [`CommunityApi`].

use crate::{CommunityApi, PostRequest, PostResponse, UploadFile, UploadResponse};
use mosaic_core::ApiConfig;
use mosaic_error::{HttpError, JsonError, MosaicError, MosaicResult};
use reqwest::{Client, Response, multipart};
use tracing::{debug, error, instrument};

const UPLOAD_PATH: &str = "/api/items/upload";
const POST_PATH: &str = "/api/items/post";
const RATE_LIMIT_PATH: &str = "/api/items/ratelimited";

/// Build the shared HTTP client.
///
/// One client is created per process and cloned into every component; clones
/// share the connection pool.
///
/// # Errors
///
/// Returns error if the TLS backend cannot be initialized.
pub fn build_http_client(config: &ApiConfig) -> MosaicResult<Client> {
    Client::builder()
        .user_agent(config.user_agent().as_str())
        .build()
        .map_err(|e| MosaicError::from(HttpError::new(format!("Failed to build client: {}", e))))
}

/// Map a non-success response into an `HttpError` that keeps the status.
pub(crate) async fn ensure_success(response: Response) -> MosaicResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!(status = %status, body = %body, "API returned error status");
    Err(HttpError::with_status(status.as_u16(), format!("{}: {}", status, body)).into())
}

/// Community API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCommunityApi {
    client: Client,
    config: ApiConfig,
}

impl HttpCommunityApi {
    /// Creates a client on top of a shared `reqwest::Client`.
    pub fn new(client: Client, config: ApiConfig) -> Self {
        debug!(base_url = %config.base_url(), "Creating community API client");
        Self { client, config }
    }

    /// API configuration in use.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl CommunityApi for HttpCommunityApi {
    #[instrument(skip(self, file), fields(file_name = %file.file_name, mime = file.mime_type, length = file.length))]
    async fn upload(&self, file: UploadFile) -> MosaicResult<UploadResponse> {
        debug!("Sending multipart upload");

        let body = reqwest::Body::wrap_stream(file.body);
        let part = multipart::Part::stream_with_length(body, file.length)
            .file_name(file.file_name)
            .mime_str(file.mime_type)
            .map_err(|e| HttpError::new(format!("Invalid content type: {}", e)))?;
        let form = multipart::Form::new().part("image", part);

        // No whole-request timeout here: large files legitimately take long.
        let response = self
            .client
            .post(self.config.endpoint(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Upload request failed");
                HttpError::new(format!("Upload request failed: {}", e))
            })?;

        let response = ensure_success(response).await?;
        let upload: UploadResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse upload response");
            JsonError::for_endpoint(UPLOAD_PATH, e.to_string())
        })?;

        debug!(key = %upload.key(), "Upload accepted");
        Ok(upload)
    }

    #[instrument(skip(self, request), fields(key = %request.content_source_key()))]
    async fn post(&self, request: &PostRequest) -> MosaicResult<PostResponse> {
        debug!(tags = %request.tags(), "Submitting post");

        let response = self
            .client
            .post(self.config.endpoint(POST_PATH))
            .timeout(self.config.timeout())
            .form(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Post request failed");
                HttpError::new(format!("Post request failed: {}", e))
            })?;

        let response = ensure_success(response).await?;
        response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse post response");
            JsonError::for_endpoint(POST_PATH, e.to_string()).into()
        })
    }

    #[instrument(skip(self))]
    async fn rate_limited(&self) -> MosaicResult<()> {
        let response = self
            .client
            .get(self.config.endpoint(RATE_LIMIT_PATH))
            .timeout(self.config.timeout())
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Rate limit request failed: {}", e)))?;

        ensure_success(response).await?;
        Ok(())
    }
}
