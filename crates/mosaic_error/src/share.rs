//! Share provider error types.

/// Kinds of share provider errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ShareErrorKind {
    /// Encoded identifier is not valid base64url or not UTF-8
    #[display("Malformed media reference: {}", _0)]
    MalformedReference(String),
    /// The media URL has no known MIME type and cannot be shared
    #[display("Media cannot be shared: {}", _0)]
    NotShareable(String),
    /// The provider is read-only
    #[display("Unsupported operation: {}", _0)]
    UnsupportedOperation(String),
    /// The remote body ended before it was fully streamed
    #[display("Stream truncated: {}", _0)]
    StreamTruncated(String),
}

/// Share provider error with location tracking.
///
/// # Examples
///
/// ```
/// use mosaic_error::{ShareError, ShareErrorKind};
///
/// let err = ShareError::new(ShareErrorKind::MalformedReference("%%%".to_string()));
/// assert!(format!("{}", err).contains("Malformed"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Share Error: {} at line {} in {}", kind, line, file)]
pub struct ShareError {
    /// The kind of error that occurred
    pub kind: ShareErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ShareError {
    /// Create a new share error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ShareErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
