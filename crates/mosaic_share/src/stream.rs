//! Reader end of the fetch pipe.

use crate::MediaFetcher;
use bytes::{Buf, Bytes};
use futures_util::{Stream, StreamExt};
use mosaic_error::{ShareError, ShareErrorKind};
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{Instrument, debug, info_span, warn};

type Chunk = io::Result<Bytes>;

/// Readable byte stream of a remote resource.
///
/// A background task downloads the resource and pushes chunks through a
/// bounded channel; it can only run ahead of the reader by the channel
/// capacity. If the download fails partway, the reader gets an error instead
/// of a clean end of stream. Dropping the stream aborts the download.
///
/// Consume it either through [`std::io::Read`] (blocks the calling thread;
/// on a thread driving an async runtime a read that would wait fails with
/// `WouldBlock`) or as a [`Stream`] of chunks.
#[derive(Debug)]
pub struct MediaStream {
    receiver: mpsc::Receiver<Chunk>,
    current: Bytes,
    failure: Option<(io::ErrorKind, String)>,
    done: bool,
    producer: AbortHandle,
}

impl MediaStream {
    /// Spawn the producer on `runtime` and return the reader end.
    pub(crate) fn spawn(
        runtime: &Handle,
        fetcher: Arc<dyn MediaFetcher>,
        url: String,
        capacity: usize,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let span = info_span!("media_stream", url = %url);
        let producer = runtime
            .spawn(pump(fetcher, url, sender).instrument(span))
            .abort_handle();

        Self {
            receiver,
            current: Bytes::new(),
            failure: None,
            done: false,
            producer,
        }
    }

    fn take_current(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.current.len());
        buf[..n].copy_from_slice(&self.current[..n]);
        self.current.advance(n);
        n
    }

    fn record(&mut self, chunk: Option<Chunk>) -> io::Result<()> {
        match chunk {
            Some(Ok(bytes)) => self.current = bytes,
            Some(Err(e)) => {
                self.failure = Some((e.kind(), e.to_string()));
                return Err(e);
            }
            None => self.done = true,
        }
        Ok(())
    }

    fn replay_failure(&self) -> Option<io::Error> {
        self.failure
            .as_ref()
            .map(|(kind, message)| io::Error::new(*kind, message.clone()))
    }
}

/// Blocking waits must not run on threads that drive an async runtime; those
/// threads play the role of the UI thread here.
pub(crate) fn blocking_forbidden() -> bool {
    Handle::try_current().is_ok()
}

impl io::Read for MediaStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            if !self.current.is_empty() {
                return Ok(self.take_current(buf));
            }
            if let Some(err) = self.replay_failure() {
                return Err(err);
            }
            if self.done {
                return Ok(0);
            }

            if blocking_forbidden() {
                return Err(io::Error::new(
                    io::ErrorKind::WouldBlock,
                    "blocking read on an async runtime thread; poll the stream instead",
                ));
            }
            let chunk = self.receiver.blocking_recv();
            self.record(chunk)?;
        }
    }
}

impl Stream for MediaStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if !self.current.is_empty() {
            let chunk = std::mem::take(&mut self.current);
            return Poll::Ready(Some(Ok(chunk)));
        }
        if self.failure.is_some() || self.done {
            return Poll::Ready(None);
        }

        match self.receiver.poll_recv(cx) {
            Poll::Ready(chunk) => match self.record(chunk) {
                Ok(()) if self.done => Poll::Ready(None),
                Ok(()) => Poll::Ready(Some(Ok(std::mem::take(&mut self.current)))),
                Err(e) => Poll::Ready(Some(Err(e))),
            },
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for MediaStream {
    fn drop(&mut self) {
        self.producer.abort();
    }
}

/// Copy the remote body into the pipe.
async fn pump(fetcher: Arc<dyn MediaFetcher>, url: String, sender: mpsc::Sender<Chunk>) {
    let mut body = match fetcher.fetch(&url).await {
        Ok(body) => body,
        Err(e) => {
            close_with_error(&sender, e.to_string()).await;
            return;
        }
    };

    let mut sent: u64 = 0;
    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(bytes) => {
                sent += bytes.len() as u64;
                if sender.send(Ok(bytes)).await.is_err() {
                    debug!(sent, "Reader closed the stream early");
                    return;
                }
            }
            Err(e) => {
                close_with_error(&sender, e.to_string()).await;
                return;
            }
        }
    }

    debug!(sent, "Streamed remote media to reader");
}

/// Mark the pipe as failed. If the reader is already gone the pipe just closes.
async fn close_with_error(sender: &mpsc::Sender<Chunk>, message: String) {
    warn!(error = %message, "Could not stream data to reader");

    let truncated = ShareError::new(ShareErrorKind::StreamTruncated(message));
    let signal = io::Error::new(io::ErrorKind::UnexpectedEof, truncated);
    if sender.send(Err(signal)).await.is_err() {
        debug!("Reader gone, closing pipe without error signal");
    }
}
