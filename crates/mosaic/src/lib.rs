//! Mosaic - media sharing and upload client
//!
//! Client-side building blocks for an image and video community:
//!
//! - **Share provider**: remote media exposed as virtual files behind opaque
//!   `content://` references, with metadata queries and a streamed body
//! - **Upload pipeline**: multipart uploads with throttled progress, followed
//!   by post submission with a sanitized tag list
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use mosaic::{
//!     ContentRating, HttpCommunityApi, MosaicConfig, PostMetadata, UploadPipeline,
//!     build_http_client,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MosaicConfig::load()?;
//!     let client = build_http_client(config.api())?;
//!     let api = Arc::new(HttpCommunityApi::new(client, config.api().clone()));
//!     let pipeline = UploadPipeline::new(api, config.upload().clone());
//!
//!     let metadata = PostMetadata::new(ContentRating::Safe, ["cats"]);
//!     let mut events = pipeline.upload_and_post("cat.png", metadata).await?;
//!     while let Some(event) = events.next().await {
//!         println!("{}", event?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Mosaic is organized as a workspace with focused crates:
//!
//! - `mosaic_error` - Error types
//! - `mosaic_core` - Ratings, tags, progress snapshots, configuration, tracing
//! - `mosaic_api` - Community API trait and HTTP client
//! - `mosaic_share` - Share provider
//! - `mosaic_upload` - Upload pipeline
//!
//! This crate (`mosaic`) re-exports everything for convenience.

pub use mosaic_api::*;
pub use mosaic_core::*;
pub use mosaic_error::*;
pub use mosaic_share::*;
pub use mosaic_upload::*;
