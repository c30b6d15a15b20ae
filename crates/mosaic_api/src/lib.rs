//! Client for the remote community API.
//!
//! The [`CommunityApi`] trait covers the three endpoints the upload pipeline
//! needs: multipart upload, post finalization and the rate-limit check.
//! [`HttpCommunityApi`] implements it on top of a shared `reqwest::Client`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod client;
mod models;

pub use api::{CommunityApi, FileBody, UploadFile};
pub use client::{HttpCommunityApi, build_http_client};
pub use models::{
    PostRequest, PostRequestBuilder, PostResponse, PostResponseBuilder, UploadResponse,
    UploadResponseBuilder,
};
