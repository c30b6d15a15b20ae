//! Core data types for the Mosaic media sharing client.
//!
//! This crate provides the types shared by the share provider and the upload
//! pipeline, plus configuration loading and tracing setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod post;
mod progress;
mod rating;
mod telemetry;

pub use config::{ApiConfig, MosaicConfig, ShareConfig, UploadConfig};
pub use post::{PostMetadata, is_reserved_tag};
pub use progress::UploadProgress;
pub use rating::ContentRating;
pub use telemetry::init_tracing;
