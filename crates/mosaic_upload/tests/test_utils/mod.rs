//! Test utilities for upload pipeline tests.
//!
//! This module provides a scripted [`CommunityApi`] that records what the
//! pipeline sends.

pub mod loopback;

use futures_util::StreamExt;
use mosaic_api::{
    CommunityApi, PostRequest, PostResponse, UploadFile, UploadResponse, UploadResponseBuilder,
};
use mosaic_error::{HttpError, MosaicResult};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// How the mock answers the upload endpoint.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum UploadBehavior {
    /// Drain the body and return this key
    Accept(String),
    /// Drain the body, then fail with this HTTP status
    Fail(u16),
    /// Never answer
    Hang,
}

/// How the mock answers the finalize endpoint.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum PostBehavior {
    /// Create a post with this id
    Accept(u64),
    /// Successful status with an error field
    Reject(String),
    /// Fail with this HTTP status
    Fail(u16),
}

/// What the upload endpoint received.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct ReceivedUpload {
    pub file_name: String,
    pub mime_type: &'static str,
    pub length: u64,
    pub bytes: Vec<u8>,
}

/// Scripted community API.
#[derive(Debug)]
pub struct MockCommunityApi {
    upload: UploadBehavior,
    post: PostBehavior,
    rate_limit_status: Option<u16>,
    chunk_delay: Option<Duration>,
    uploads: Mutex<Vec<ReceivedUpload>>,
    posts: Mutex<Vec<PostRequest>>,
}

#[allow(dead_code)]
impl MockCommunityApi {
    /// Accept uploads under `key` and create post 42.
    pub fn accepting(key: &str) -> Self {
        Self {
            upload: UploadBehavior::Accept(key.to_string()),
            post: PostBehavior::Accept(42),
            rate_limit_status: None,
            chunk_delay: None,
            uploads: Mutex::new(Vec::new()),
            posts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_upload(mut self, behavior: UploadBehavior) -> Self {
        self.upload = behavior;
        self
    }

    pub fn with_post(mut self, behavior: PostBehavior) -> Self {
        self.post = behavior;
        self
    }

    /// Answer the rate-limit check with an error status.
    pub fn with_rate_limit_status(mut self, status: u16) -> Self {
        self.rate_limit_status = Some(status);
        self
    }

    /// Pause after every body chunk, like a slow link.
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = Some(delay);
        self
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<PostRequest> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CommunityApi for MockCommunityApi {
    async fn upload(&self, mut file: UploadFile) -> MosaicResult<UploadResponse> {
        if let UploadBehavior::Hang = self.upload {
            return std::future::pending().await;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = file.body.next().await {
            let chunk = chunk.map_err(|e| HttpError::new(e.to_string()))?;
            bytes.extend_from_slice(&chunk);
            if let Some(delay) = self.chunk_delay {
                tokio::time::sleep(delay).await;
            }
        }

        self.uploads.lock().unwrap().push(ReceivedUpload {
            file_name: file.file_name,
            mime_type: file.mime_type,
            length: file.length,
            bytes,
        });

        match &self.upload {
            UploadBehavior::Accept(key) => {
                Ok(UploadResponseBuilder::default().key(key.clone()).build().unwrap())
            },
            UploadBehavior::Fail(status) => {
                Err(HttpError::with_status(*status, "upload refused").into())
            }
            UploadBehavior::Hang => unreachable!(),
        }
    }

    async fn post(&self, request: &PostRequest) -> MosaicResult<PostResponse> {
        self.posts.lock().unwrap().push(request.clone());

        match &self.post {
            PostBehavior::Accept(id) => Ok(PostResponse::builder().item_id(*id).build().unwrap()),
            PostBehavior::Reject(message) => Ok(PostResponse::builder()
                .error(Some(message.clone()))
                .build()
                .unwrap()),
            PostBehavior::Fail(status) => Err(HttpError::with_status(*status, "post failed").into()),
        }
    }

    async fn rate_limited(&self) -> MosaicResult<()> {
        match self.rate_limit_status {
            None => Ok(()),
            Some(status) => Err(HttpError::with_status(status, "rate limit check failed").into()),
        }
    }
}

/// Write `contents` to `name` inside `dir`.
pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
