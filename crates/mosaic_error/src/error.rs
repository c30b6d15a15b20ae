//! Top-level error wrapper types.

use crate::{ConfigError, HttpError, JsonError, ShareError, UploadError};

/// Every failure a Mosaic crate can surface.
///
/// # Examples
///
/// ```
/// use mosaic_error::{HttpError, MosaicError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: MosaicError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MosaicErrorKind {
    /// HTTP transport or status error
    #[from(HttpError)]
    Http(HttpError),
    /// Response decoding error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Share provider error
    #[from(ShareError)]
    Share(ShareError),
    /// Upload pipeline error
    #[from(UploadError)]
    Upload(UploadError),
}

/// Mosaic error with kind discrimination.
///
/// # Examples
///
/// ```
/// use mosaic_error::{MosaicResult, UploadError, UploadErrorKind};
///
/// fn might_fail() -> MosaicResult<()> {
///     Err(UploadError::new(UploadErrorKind::Cancelled))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Mosaic Error: {}", _0)]
pub struct MosaicError(Box<MosaicErrorKind>);

impl MosaicError {
    /// Create a new error from a kind.
    pub fn new(kind: MosaicErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MosaicErrorKind {
        &self.0
    }

    /// Response status carried by an HTTP failure, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use mosaic_error::{HttpError, MosaicError};
    ///
    /// let err = MosaicError::from(HttpError::with_status(403, "Forbidden"));
    /// assert_eq!(err.http_status(), Some(403));
    /// ```
    pub fn http_status(&self) -> Option<u16> {
        match self.kind() {
            MosaicErrorKind::Http(http) => http.status,
            _ => None,
        }
    }

    /// Upload error kind, if this is an upload failure.
    pub fn upload_kind(&self) -> Option<&crate::UploadErrorKind> {
        match self.kind() {
            MosaicErrorKind::Upload(upload) => Some(&upload.kind),
            _ => None,
        }
    }

    /// Share error kind, if this is a share provider failure.
    pub fn share_kind(&self) -> Option<&crate::ShareErrorKind> {
        match self.kind() {
            MosaicErrorKind::Share(share) => Some(&share.kind),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to MosaicErrorKind
impl<T> From<T> for MosaicError
where
    T: Into<MosaicErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Mosaic operations.
pub type MosaicResult<T> = std::result::Result<T, MosaicError>;
