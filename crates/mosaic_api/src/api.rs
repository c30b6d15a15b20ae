//! The community API seam.

use crate::{PostRequest, PostResponse, UploadResponse};
use bytes::Bytes;
use futures_util::Stream;
use mosaic_error::MosaicResult;
use std::pin::Pin;

/// Byte stream of a file body.
pub type FileBody = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send + Sync>>;

/// Streaming file body handed to the upload endpoint.
///
/// The body is consumed exactly once by the transport; progress reporting
/// lives inside the stream, so whoever polls it drives the progress events.
pub struct UploadFile {
    /// File name reported in the multipart part
    pub file_name: String,
    /// Declared content type of the part
    pub mime_type: &'static str,
    /// Exact body length in bytes
    pub length: u64,
    /// File contents
    pub body: FileBody,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// Remote endpoints used by the upload pipeline.
///
/// `HttpCommunityApi` talks to the real service; tests substitute mocks.
#[async_trait::async_trait]
pub trait CommunityApi: Send + Sync {
    /// Send a file as a multipart request with a single part named `image`.
    async fn upload(&self, file: UploadFile) -> MosaicResult<UploadResponse>;

    /// Finalize an uploaded file as a post.
    ///
    /// Semantic rejections come back inside `PostResponse::error`, not as `Err`.
    async fn post(&self, request: &PostRequest) -> MosaicResult<PostResponse>;

    /// Query the rate-limit endpoint.
    ///
    /// A limited account answers with HTTP 403, surfaced as an `HttpError`
    /// carrying that status.
    async fn rate_limited(&self) -> MosaicResult<()>;
}
