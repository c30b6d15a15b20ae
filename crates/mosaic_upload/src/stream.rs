//! Consumer side of an upload.

use futures_util::Stream;
use mosaic_core::UploadProgress;
use mosaic_error::MosaicResult;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Ordered progress of one upload.
///
/// Yields `InProgress` snapshots, then `Uploaded`, then (for
/// [`upload_and_post`](crate::UploadPipeline::upload_and_post)) `Completed`.
/// A failure is yielded as the last item. Dropping the stream cancels the
/// upload.
#[derive(Debug)]
pub struct UploadStream {
    events: mpsc::UnboundedReceiver<MosaicResult<UploadProgress>>,
    latest: watch::Receiver<UploadProgress>,
    cancel: CancellationToken,
}

impl UploadStream {
    pub(crate) fn new(
        events: mpsc::UnboundedReceiver<MosaicResult<UploadProgress>>,
        latest: watch::Receiver<UploadProgress>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            events,
            latest,
            cancel,
        }
    }

    /// Watch the latest snapshot.
    ///
    /// The receiver holds the current value right away, so late observers
    /// never wait for the next event. Errors are only delivered through the
    /// stream itself.
    pub fn subscribe(&self) -> watch::Receiver<UploadProgress> {
        self.latest.clone()
    }

    /// Abort the in-flight request; the stream then ends with `Cancelled`.
    ///
    /// A post submission that already started is allowed to finish.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this upload, for wiring into other tasks.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Stream for UploadStream {
    type Item = MosaicResult<UploadProgress>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.poll_recv(cx)
    }
}

impl Drop for UploadStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
