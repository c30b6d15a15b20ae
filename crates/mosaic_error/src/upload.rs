//! Upload pipeline error types.

/// Kinds of upload errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum UploadErrorKind {
    /// The local file is missing, not a regular file, or unreadable
    #[display("File unavailable: {}", _0)]
    FileUnavailable(String),
    /// The server refused to create the post
    #[display("Post rejected: {}", _0)]
    PostRejected(String),
    /// The server answered with something we cannot use
    #[display("Invalid response: {}", _0)]
    InvalidResponse(String),
    /// The caller cancelled the operation
    #[display("Upload cancelled")]
    Cancelled,
}

/// Upload error with location tracking.
///
/// # Examples
///
/// ```
/// use mosaic_error::{UploadError, UploadErrorKind};
///
/// let err = UploadError::new(UploadErrorKind::PostRejected("duplicate".to_string()));
/// assert!(format!("{}", err).contains("duplicate"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upload Error: {} at line {} in {}", kind, line, file)]
pub struct UploadError {
    /// The kind of error that occurred
    pub kind: UploadErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl UploadError {
    /// Create a new upload error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: UploadErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
