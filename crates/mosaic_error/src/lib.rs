//! Error types for the Mosaic client.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use mosaic_error::{MosaicResult, HttpError};
//!
//! fn fetch_data() -> MosaicResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod json;
mod share;
mod upload;

pub use config::ConfigError;
pub use error::{MosaicError, MosaicErrorKind, MosaicResult};
pub use http::HttpError;
pub use json::JsonError;
pub use share::{ShareError, ShareErrorKind};
pub use upload::{UploadError, UploadErrorKind};
