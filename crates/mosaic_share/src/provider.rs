//! The virtual-file share provider.

use crate::stream::blocking_forbidden;
use crate::{MediaFetcher, MediaReference, MediaStream, can_share, guess_mime_type, mime_matches};
use derive_getters::Getters;
use mosaic_core::ShareConfig;
use mosaic_error::{MosaicResult, ShareError, ShareErrorKind};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, instrument, warn};

/// Queryable columns of a shared media item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter, derive_more::Display,
)]
pub enum Column {
    /// File name shown to the user
    #[display("_display_name")]
    DisplayName,
    /// Size in bytes, nullable
    #[display("_size")]
    Size,
}

impl Column {
    /// Wire name of the column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::DisplayName => "_display_name",
            Column::Size => "_size",
        }
    }

    /// Look a column up by wire name or by its `DISPLAY_NAME`/`SIZE` alias.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "_display_name" | "DISPLAY_NAME" => Some(Column::DisplayName),
            "_size" | "SIZE" => Some(Column::Size),
            _ => None,
        }
    }
}

/// Projection used when the caller does not name any columns.
pub const DEFAULT_PROJECTION: [&str; 2] = ["_display_name", "_size"];

/// Value of one query column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    /// Text value
    Text(String),
    /// Integer value
    Integer(u64),
    /// Unknown or unsupported column
    Null,
}

/// Single result row of [`MediaStreamProvider::query`].
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct QueryRow {
    /// Column names in projection order
    columns: Vec<String>,
    /// Values aligned with `columns`
    values: Vec<ColumnValue>,
}

impl QueryRow {
    /// Value of a named column, if it was projected.
    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|idx| &self.values[idx])
    }
}

/// Metadata of a shared media item.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MediaMetadata {
    /// Last path segment of the remote URL
    display_name: String,
    /// Remote size; `None` when unknown or skipped
    size_bytes: Option<u64>,
}

/// Exposes remote media as read-only virtual files addressed by encoded ids.
///
/// The synchronous entry points (`query`, `query_metadata`, `open_stream`)
/// are meant for plain threads; the provider drives its async work on the
/// multi-threaded runtime behind `runtime`.
pub struct MediaStreamProvider {
    fetcher: Arc<dyn MediaFetcher>,
    runtime: Handle,
    config: ShareConfig,
}

impl std::fmt::Debug for MediaStreamProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStreamProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MediaStreamProvider {
    /// Create a provider.
    pub fn new(fetcher: Arc<dyn MediaFetcher>, runtime: Handle, config: ShareConfig) -> Self {
        Self {
            fetcher,
            runtime,
            config,
        }
    }

    /// Share configuration in use.
    pub fn config(&self) -> &ShareConfig {
        &self.config
    }

    /// Reference for a remote URL that is about to be shared.
    ///
    /// # Errors
    ///
    /// Returns `NotShareable` if the URL has no known MIME type.
    pub fn reference(&self, remote_url: &str) -> MosaicResult<MediaReference> {
        if !can_share(remote_url) {
            return Err(ShareError::new(ShareErrorKind::NotShareable(remote_url.to_string())).into());
        }
        Ok(MediaReference::new(remote_url))
    }

    /// Full `content://` URI for sharing a remote URL.
    ///
    /// # Errors
    ///
    /// Returns `NotShareable` if the URL has no known MIME type.
    #[instrument(skip(self))]
    pub fn share_uri(&self, remote_url: &str) -> MosaicResult<String> {
        let uri = self.reference(remote_url)?.to_uri(self.config.authority());
        debug!(%uri, "Built share uri");
        Ok(uri)
    }

    /// MIME type of the referenced media, from its URL suffix only.
    pub fn resolve_mime_type(&self, encoded_id: &str) -> MosaicResult<Option<&'static str>> {
        let reference = MediaReference::from_encoded(encoded_id)?;
        Ok(guess_mime_type(reference.remote_url()))
    }

    /// MIME types this item can be opened as, restricted to `mime_filter`.
    pub fn stream_types(
        &self,
        encoded_id: &str,
        mime_filter: &str,
    ) -> MosaicResult<Vec<&'static str>> {
        Ok(self
            .resolve_mime_type(encoded_id)?
            .filter(|mime| mime_matches(mime_filter, mime))
            .into_iter()
            .collect())
    }

    /// Display name and size of the referenced media.
    ///
    /// The size needs a HEAD request. On a thread that drives an async runtime
    /// that request is skipped and the size reported as unknown; lookup
    /// failures are logged and also reported as unknown.
    ///
    /// # Errors
    ///
    /// Returns `MalformedReference` if the id does not decode.
    #[instrument(skip(self))]
    pub fn query_metadata(&self, encoded_id: &str) -> MosaicResult<MediaMetadata> {
        let reference = MediaReference::from_encoded(encoded_id)?;
        let size_bytes = self.blocking_size(&reference);

        Ok(MediaMetadata {
            display_name: reference.display_name(),
            size_bytes,
        })
    }

    /// Async variant of [`query_metadata`](Self::query_metadata) for callers
    /// already on the runtime; always attempts the size lookup.
    #[instrument(skip(self))]
    pub async fn fetch_metadata(&self, encoded_id: &str) -> MosaicResult<MediaMetadata> {
        let reference = MediaReference::from_encoded(encoded_id)?;
        let size_bytes = match self.fetcher.content_length(reference.remote_url()).await {
            Ok(size) => size,
            Err(e) => {
                warn!(error = %e, "Could not estimate size");
                None
            }
        };

        Ok(MediaMetadata {
            display_name: reference.display_name(),
            size_bytes,
        })
    }

    /// Row for the requested columns; `None` selects [`DEFAULT_PROJECTION`].
    ///
    /// Unknown column names yield [`ColumnValue::Null`].
    #[instrument(skip(self, projection))]
    pub fn query(&self, encoded_id: &str, projection: Option<&[&str]>) -> MosaicResult<QueryRow> {
        let projection = projection.unwrap_or(&DEFAULT_PROJECTION);
        let reference = MediaReference::from_encoded(encoded_id)?;

        let wants_size = projection
            .iter()
            .any(|name| Column::from_name(name) == Some(Column::Size));
        let size_bytes = if wants_size {
            self.blocking_size(&reference)
        } else {
            None
        };

        let values = projection
            .iter()
            .map(|name| match Column::from_name(name) {
                Some(Column::DisplayName) => ColumnValue::Text(reference.display_name()),
                Some(Column::Size) => size_bytes.map_or(ColumnValue::Null, ColumnValue::Integer),
                None => ColumnValue::Null,
            })
            .collect();

        Ok(QueryRow {
            columns: projection.iter().map(|name| name.to_string()).collect(),
            values,
        })
    }

    /// Open the referenced media as a readable stream.
    ///
    /// # Errors
    ///
    /// Returns `MalformedReference` if the id does not decode. Download
    /// failures surface later, as read errors on the stream.
    #[instrument(skip(self))]
    pub fn open_stream(&self, encoded_id: &str) -> MosaicResult<MediaStream> {
        let reference = MediaReference::from_encoded(encoded_id)?;
        debug!(url = %reference.remote_url(), "Opening media stream");

        Ok(MediaStream::spawn(
            &self.runtime,
            Arc::clone(&self.fetcher),
            reference.remote_url().clone(),
            *self.config.pipe_capacity(),
        ))
    }

    /// The provider is read-only.
    pub fn insert(&self, _encoded_id: &str) -> MosaicResult<()> {
        Err(ShareError::new(ShareErrorKind::UnsupportedOperation("insert".to_string())).into())
    }

    /// The provider is read-only.
    pub fn update(&self, _encoded_id: &str) -> MosaicResult<()> {
        Err(ShareError::new(ShareErrorKind::UnsupportedOperation("update".to_string())).into())
    }

    /// The provider is read-only.
    pub fn delete(&self, _encoded_id: &str) -> MosaicResult<()> {
        Err(ShareError::new(ShareErrorKind::UnsupportedOperation("delete".to_string())).into())
    }

    fn blocking_size(&self, reference: &MediaReference) -> Option<u64> {
        if blocking_forbidden() {
            debug!("On an async runtime thread, skipping size lookup");
            return None;
        }

        match self
            .runtime
            .block_on(self.fetcher.content_length(reference.remote_url()))
        {
            Ok(size) => size,
            Err(e) => {
                warn!(error = %e, "Could not estimate size");
                None
            }
        }
    }
}
