//! Upload and post sequencing.

use crate::progress::{ProgressBody, ProgressEmitter, ProgressThrottle};
use crate::sniff::sniff_file;
use crate::UploadStream;
use mosaic_api::{CommunityApi, PostRequest, UploadFile};
use mosaic_core::{PostMetadata, UploadConfig, UploadProgress};
use mosaic_error::{MosaicResult, UploadError, UploadErrorKind};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::fs::File;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, instrument, warn};

/// HTTP status the rate-limit check answers with when posting is blocked.
const RATE_LIMITED_STATUS: u16 = 403;

/// Streams local files to the community API and turns them into posts.
///
/// Every call runs independently; concurrent uploads share nothing but the
/// API client. Nothing is retried.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
/// use mosaic_api::{HttpCommunityApi, build_http_client};
/// use mosaic_core::{ContentRating, MosaicConfig, PostMetadata};
/// use mosaic_upload::UploadPipeline;
/// use std::sync::Arc;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MosaicConfig::load()?;
/// let client = build_http_client(config.api())?;
/// let api = Arc::new(HttpCommunityApi::new(client, config.api().clone()));
/// let pipeline = UploadPipeline::new(api, config.upload().clone());
///
/// let metadata = PostMetadata::new(ContentRating::Safe, ["cats"]);
/// let mut progress = pipeline.upload_and_post("cat.png", metadata).await?;
/// while let Some(event) = progress.next().await {
///     println!("{}", event?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct UploadPipeline {
    api: Arc<dyn CommunityApi>,
    config: UploadConfig,
}

impl std::fmt::Debug for UploadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A local file that passed the availability checks.
struct Source {
    file: File,
    file_name: String,
    length: u64,
}

impl UploadPipeline {
    /// Create a pipeline on top of a community API client.
    pub fn new(api: Arc<dyn CommunityApi>, config: UploadConfig) -> Self {
        Self { api, config }
    }

    /// Upload settings in use.
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Start uploading a file.
    ///
    /// The returned stream yields `InProgress` snapshots from 0.0 to 1.0 and
    /// ends with `Uploaded(key)`, or with the error that stopped the upload.
    ///
    /// # Errors
    ///
    /// Fails with `FileUnavailable`, before anything is sent, when the path
    /// does not exist, is not a regular file or cannot be opened.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn upload(&self, path: impl AsRef<Path>) -> MosaicResult<UploadStream> {
        let source = open_source(path.as_ref()).await?;
        let (stream, emitter, cancel, started) = start_progress();

        let api = Arc::clone(&self.api);
        let config = self.config.clone();
        let span = info_span!("upload", file_name = %source.file_name);
        tokio::spawn(
            async move {
                if let Err(e) = send_file(api.as_ref(), &config, source, &emitter, &cancel, started).await
                {
                    warn!(error = %e, "Upload failed");
                    emitter.fail(e);
                }
            }
            .instrument(span),
        );

        Ok(stream)
    }

    /// Upload a file and, once the server accepted it, submit it as a post.
    ///
    /// The stream carries the upload's events followed by
    /// `Completed(post_id)`. The post is only submitted after `Uploaded`; a
    /// failed or cancelled upload never reaches the finalize endpoint.
    /// Cancelling after the submission started does not interrupt it.
    ///
    /// # Errors
    ///
    /// Same preconditions as [`upload`](Self::upload).
    #[instrument(skip(self, path, metadata), fields(path = %path.as_ref().display(), rating = %metadata.rating()))]
    pub async fn upload_and_post(
        &self,
        path: impl AsRef<Path>,
        metadata: PostMetadata,
    ) -> MosaicResult<UploadStream> {
        let source = open_source(path.as_ref()).await?;
        let (stream, emitter, cancel, started) = start_progress();

        let api = Arc::clone(&self.api);
        let config = self.config.clone();
        let span = info_span!("upload_and_post", file_name = %source.file_name);
        tokio::spawn(
            async move {
                if let Err(e) =
                    send_then_post(api.as_ref(), &config, source, &metadata, &emitter, &cancel, started)
                        .await
                {
                    warn!(error = %e, "Upload and post failed");
                    emitter.fail(e);
                }
            }
            .instrument(span),
        );

        Ok(stream)
    }

    /// Finalize an uploaded key as a post and return the new post id.
    ///
    /// # Errors
    ///
    /// `PostRejected` with the server's message when the response carries an
    /// error, `InvalidResponse` when it carries no usable id, and transport
    /// errors unchanged.
    #[instrument(skip(self, metadata), fields(rating = %metadata.rating()))]
    pub async fn submit_post(&self, remote_key: &str, metadata: &PostMetadata) -> MosaicResult<u64> {
        submit(self.api.as_ref(), remote_key, metadata).await
    }

    /// Whether the account is currently rate limited.
    ///
    /// A 403 from the rate-limit endpoint means limited; any other failure is returned as is.
    #[instrument(skip(self))]
    pub async fn check_rate_limited(&self) -> MosaicResult<bool> {
        match self.api.rate_limited().await {
            Ok(()) => Ok(false),
            Err(e) if e.http_status() == Some(RATE_LIMITED_STATUS) => {
                info!("Account is rate limited");
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}

/// Channels for one upload, with the initial 0.0 already published.
fn start_progress() -> (UploadStream, ProgressEmitter, CancellationToken, Instant) {
    let initial = UploadProgress::InProgress { fraction: 0.0 };
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (latest_tx, latest_rx) = watch::channel(initial.clone());
    let cancel = CancellationToken::new();

    let emitter = ProgressEmitter::new(events_tx, latest_tx);
    emitter.emit(initial);
    let started = Instant::now();

    let stream = UploadStream::new(events_rx, latest_rx, cancel.clone());
    (stream, emitter, cancel, started)
}

async fn open_source(path: &Path) -> MosaicResult<Source> {
    let unavailable = |reason: String| {
        UploadError::new(UploadErrorKind::FileUnavailable(format!(
            "{}: {}",
            path.display(),
            reason
        )))
    };

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| unavailable(e.to_string()))?;
    if !metadata.is_file() {
        return Err(unavailable("not a regular file".to_string()).into());
    }

    let file = File::open(path)
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    debug!(file_name = %file_name, length = metadata.len(), "File available for upload");
    Ok(Source {
        file,
        file_name,
        length: metadata.len(),
    })
}

/// Send the file and return the key the server assigned.
async fn send_file(
    api: &dyn CommunityApi,
    config: &UploadConfig,
    source: Source,
    emitter: &ProgressEmitter,
    cancel: &CancellationToken,
    started: Instant,
) -> MosaicResult<String> {
    let Source {
        mut file,
        file_name,
        length,
    } = source;

    let mime_type = sniff_file(&mut file).await.map_err(|e| {
        UploadError::new(UploadErrorKind::FileUnavailable(format!(
            "{}: {}",
            file_name, e
        )))
    })?;

    let throttle = ProgressThrottle::new(config.progress_interval(), started);
    let body = ProgressBody::new(file, length, *config.chunk_size(), throttle, emitter.clone());
    let upload = UploadFile {
        file_name,
        mime_type,
        length,
        body: Box::pin(body),
    };

    debug!(mime_type, length, "Sending file");
    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            info!("Upload cancelled");
            return Err(UploadError::new(UploadErrorKind::Cancelled).into());
        }
        result = api.upload(upload) => result?,
    };

    let key = response.key().trim().to_string();
    if key.is_empty() {
        return Err(UploadError::new(UploadErrorKind::InvalidResponse(
            "upload response without key".to_string(),
        ))
        .into());
    }

    emitter.ensure_full();
    info!(key = %key, "Upload accepted");
    emitter.emit(UploadProgress::Uploaded {
        remote_key: key.clone(),
    });
    Ok(key)
}

/// Upload, then finalize once the key is known.
///
/// Cancellation is honored up to the point where the post is submitted.
async fn send_then_post(
    api: &dyn CommunityApi,
    config: &UploadConfig,
    source: Source,
    metadata: &PostMetadata,
    emitter: &ProgressEmitter,
    cancel: &CancellationToken,
    started: Instant,
) -> MosaicResult<()> {
    let key = send_file(api, config, source, emitter, cancel, started).await?;

    if cancel.is_cancelled() {
        info!("Cancelled before post submission");
        return Err(UploadError::new(UploadErrorKind::Cancelled).into());
    }

    let post_id = submit(api, &key, metadata).await?;
    emitter.emit(UploadProgress::Completed { post_id });
    Ok(())
}

async fn submit(
    api: &dyn CommunityApi,
    remote_key: &str,
    metadata: &PostMetadata,
) -> MosaicResult<u64> {
    let request = PostRequest::new(metadata.rating().as_str(), metadata.tag_string(), remote_key);
    debug!(tags = %request.tags(), key = %remote_key, "Submitting post");

    let response = api.post(&request).await?;

    if let Some(message) = response.error() {
        warn!(error = %message, "Post rejected");
        return Err(UploadError::new(UploadErrorKind::PostRejected(message.clone())).into());
    }

    match *response.item_id() {
        0 => Err(UploadError::new(UploadErrorKind::InvalidResponse(
            "post response without item id".to_string(),
        ))
        .into()),
        post_id => {
            info!(post_id, "Post created");
            Ok(post_id)
        }
    }
}
