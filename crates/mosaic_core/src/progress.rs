//! Upload progress snapshots.

use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of an in-flight upload.
///
/// A stream of these ends with exactly one terminal item: either
/// `Completed` or an error.
///
/// # Examples
///
/// ```
/// use mosaic_core::UploadProgress;
///
/// let progress = UploadProgress::InProgress { fraction: 0.5 };
/// assert_eq!(progress.fraction(), Some(0.5));
/// assert!(!progress.is_completed());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UploadProgress {
    /// Bytes are being sent; `fraction` is in `[0, 1]`
    InProgress {
        /// Share of the file handed to the transport
        fraction: f32,
    },
    /// The server accepted the bytes and returned a key
    Uploaded {
        /// Key identifying the uploaded content on the server
        remote_key: String,
    },
    /// The post was created
    Completed {
        /// Identifier of the new post
        post_id: u64,
    },
}

impl UploadProgress {
    /// Progress fraction, if this is an `InProgress` snapshot.
    pub fn fraction(&self) -> Option<f32> {
        match self {
            UploadProgress::InProgress { fraction } => Some(*fraction),
            _ => None,
        }
    }

    /// Remote key, if this is an `Uploaded` snapshot.
    pub fn remote_key(&self) -> Option<&str> {
        match self {
            UploadProgress::Uploaded { remote_key } => Some(remote_key),
            _ => None,
        }
    }

    /// Post id, if this is a `Completed` snapshot.
    pub fn post_id(&self) -> Option<u64> {
        match self {
            UploadProgress::Completed { post_id } => Some(*post_id),
            _ => None,
        }
    }

    /// Whether the post has been created.
    pub fn is_completed(&self) -> bool {
        matches!(self, UploadProgress::Completed { .. })
    }
}

impl std::fmt::Display for UploadProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadProgress::InProgress { fraction } => {
                write!(f, "uploading {:.0}%", fraction * 100.0)
            }
            UploadProgress::Uploaded { remote_key } => write!(f, "uploaded as {}", remote_key),
            UploadProgress::Completed { post_id } => write!(f, "posted as item {}", post_id),
        }
    }
}
