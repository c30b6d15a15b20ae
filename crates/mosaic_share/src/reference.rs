//! Opaque references to remote media.

use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use derive_getters::Getters;
use mosaic_error::{MosaicResult, ShareError, ShareErrorKind};

/// URL-safe base64 that writes padding and accepts input with or without it.
const REFERENCE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Scheme of share URIs.
pub const SHARE_SCHEME: &str = "content";

/// Encode a remote URL into a URL-safe identifier.
///
/// # Examples
///
/// ```
/// use mosaic_share::{decode_reference, encode_reference};
///
/// let id = encode_reference("https://img.example.com/2024/cat.png");
/// assert!(!id.contains('/'));
/// assert_eq!(decode_reference(&id).unwrap(), "https://img.example.com/2024/cat.png");
/// ```
pub fn encode_reference(remote_url: &str) -> String {
    REFERENCE_ENGINE.encode(remote_url.as_bytes())
}

/// Decode an identifier produced by [`encode_reference`].
///
/// # Errors
///
/// Returns `MalformedReference` when the input is not base64url or does not
/// decode to UTF-8.
pub fn decode_reference(encoded_id: &str) -> MosaicResult<String> {
    let bytes = REFERENCE_ENGINE.decode(encoded_id.trim()).map_err(|e| {
        ShareError::new(ShareErrorKind::MalformedReference(format!(
            "{}: {}",
            encoded_id, e
        )))
    })?;

    String::from_utf8(bytes).map_err(|e| {
        ShareError::new(ShareErrorKind::MalformedReference(format!(
            "{}: not UTF-8: {}",
            encoded_id, e
        )))
        .into()
    })
}

/// A remote media resource as seen by share consumers.
///
/// Created on demand when something is shared; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
pub struct MediaReference {
    /// Where the media actually lives
    remote_url: String,
    /// URL-safe encoding of `remote_url`
    encoded_id: String,
}

impl MediaReference {
    /// Reference a remote URL.
    pub fn new(remote_url: impl Into<String>) -> Self {
        let remote_url = remote_url.into();
        let encoded_id = encode_reference(&remote_url);
        Self {
            remote_url,
            encoded_id,
        }
    }

    /// Rebuild a reference from its encoded identifier.
    ///
    /// # Errors
    ///
    /// Returns `MalformedReference` if the identifier does not decode.
    pub fn from_encoded(encoded_id: impl Into<String>) -> MosaicResult<Self> {
        let encoded_id = encoded_id.into();
        let remote_url = decode_reference(&encoded_id)?;
        Ok(Self {
            remote_url,
            encoded_id,
        })
    }

    /// Rebuild a reference from a share URI (`content://<authority>/<id>`).
    ///
    /// Only the last path segment is looked at.
    ///
    /// # Errors
    ///
    /// Returns `MalformedReference` if the URI has no path segment or the
    /// segment does not decode.
    pub fn from_uri(uri: &str) -> MosaicResult<Self> {
        let segment = url::Url::parse(uri)
            .ok()
            .and_then(|parsed| {
                parsed
                    .path_segments()
                    .and_then(|mut segments| segments.next_back().map(str::to_string))
            })
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| {
                ShareError::new(ShareErrorKind::MalformedReference(format!(
                    "no path segment in {}",
                    uri
                )))
            })?;

        Self::from_encoded(segment)
    }

    /// Share URI for this reference under `authority`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mosaic_share::MediaReference;
    ///
    /// let reference = MediaReference::new("https://img.example.com/a.mp4");
    /// let uri = reference.to_uri("com.example.mosaic.ShareProvider");
    /// assert!(uri.starts_with("content://com.example.mosaic.ShareProvider/"));
    /// assert_eq!(MediaReference::from_uri(&uri).unwrap(), reference);
    /// ```
    pub fn to_uri(&self, authority: &str) -> String {
        format!("{}://{}/{}", SHARE_SCHEME, authority, self.encoded_id)
    }

    /// Last non-empty path segment of the remote URL, percent-decoded.
    ///
    /// Trailing slashes are ignored. Falls back to splitting the raw text on
    /// `/` when the URL does not parse.
    pub fn display_name(&self) -> String {
        let segment = match url::Url::parse(&self.remote_url) {
            Ok(parsed) => parsed
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
                .unwrap_or_default()
                .to_string(),
            Err(_) => self
                .remote_url
                .split('/')
                .filter(|s| !s.is_empty())
                .next_back()
                .unwrap_or_default()
                .to_string(),
        };

        percent_encoding::percent_decode_str(&segment)
            .decode_utf8_lossy()
            .into_owned()
    }
}
