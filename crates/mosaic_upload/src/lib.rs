//! Upload pipeline for the Mosaic client.
//!
//! [`UploadPipeline`] streams a local file to the community API as a
//! multipart request, publishing throttled progress while the transport
//! pulls the body, and optionally finalizes the upload as a post.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod pipeline;
mod progress;
mod sniff;
mod stream;

pub use pipeline::UploadPipeline;
pub use progress::ProgressThrottle;
pub use sniff::{PNG_MAGIC, sniff_mime_type};
pub use stream::UploadStream;
