//! Share provider exposing remote media as virtual files.
//!
//! Remote URLs are wrapped into opaque, self-describing identifiers
//! (`content://<authority>/<base64url(url)>`). Consumers holding such an
//! identifier can ask for a display name, size and MIME type, and open a
//! byte stream that is filled by a background download.
//!
//! # Example
//!
//! ```no_run
//! use mosaic_core::ShareConfig;
//! use mosaic_share::{HttpMediaFetcher, MediaReference, MediaStreamProvider};
//! use std::io::Read;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let runtime = tokio::runtime::Runtime::new()?;
//! let fetcher = Arc::new(HttpMediaFetcher::new(reqwest::Client::new()));
//! let provider = MediaStreamProvider::new(fetcher, runtime.handle().clone(), ShareConfig::default());
//!
//! let uri = provider.share_uri("https://img.example.com/cat.png")?;
//! let reference = MediaReference::from_uri(&uri)?;
//!
//! let mut data = Vec::new();
//! provider.open_stream(reference.encoded_id())?.read_to_end(&mut data)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod fetcher;
mod mime;
mod provider;
mod reference;
mod stream;

pub use fetcher::{HttpMediaFetcher, MediaBody, MediaFetcher};
pub use mime::{can_share, guess_mime_type, mime_matches};
pub use provider::{
    Column, ColumnValue, DEFAULT_PROJECTION, MediaMetadata, MediaStreamProvider, QueryRow,
};
pub use reference::{MediaReference, SHARE_SCHEME, decode_reference, encode_reference};
pub use stream::MediaStream;
