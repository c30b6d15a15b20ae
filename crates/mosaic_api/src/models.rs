//! Wire models for the community API.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Response of the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct UploadResponse {
    /// Key identifying the uploaded bytes, passed on to the finalize call
    key: String,
}

/// Form body of the finalize (post) endpoint.
///
/// # Examples
///
/// ```
/// use mosaic_api::PostRequest;
///
/// let request = PostRequest::builder()
///     .content_type("safe")
///     .tags("cats,safe")
///     .content_source_key("abc123")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.content_source_key(), "abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct PostRequest {
    /// Lowercase rating name
    #[serde(rename = "type")]
    content_type: String,
    /// Sanitized comma-joined tag string
    tags: String,
    /// Key returned by the upload endpoint
    #[serde(rename = "contentSourceKey")]
    content_source_key: String,
}

impl PostRequest {
    /// Finalize request for an uploaded key.
    pub fn new(
        content_type: impl Into<String>,
        tags: impl Into<String>,
        content_source_key: impl Into<String>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            tags: tags.into(),
            content_source_key: content_source_key.into(),
        }
    }

    /// Create a builder for a finalize request.
    pub fn builder() -> PostRequestBuilder {
        PostRequestBuilder::default()
    }
}

/// Response of the finalize (post) endpoint.
///
/// The server reports semantic rejections through `error`, with a
/// successful HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct PostResponse {
    /// Rejection reason, absent on success
    #[serde(default)]
    #[builder(default)]
    error: Option<String>,
    /// Id of the created item, zero when rejected
    #[serde(default)]
    #[builder(default)]
    item_id: u64,
}

impl PostResponse {
    /// Create a builder for a finalize response.
    pub fn builder() -> PostResponseBuilder {
        PostResponseBuilder::default()
    }
}
