//! Progress accounting for streamed uploads.

use bytes::Bytes;
use futures_util::Stream;
use mosaic_core::UploadProgress;
use mosaic_error::MosaicResult;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, ready};
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::sync::{mpsc, watch};
use tokio_util::io::ReaderStream;
use tracing::trace;

/// Decides which progress fractions are worth reporting.
///
/// The first snapshot (0.0) is assumed to be emitted when the throttle is
/// created. Intermediate fractions are spaced at least `interval` apart and
/// strictly increase. 1.0 is reported exactly once, when everything was sent,
/// regardless of the interval.
///
/// # Examples
///
/// ```
/// use mosaic_upload::ProgressThrottle;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let mut throttle = ProgressThrottle::new(Duration::from_millis(50), start);
///
/// assert_eq!(throttle.observe(10, 100, start + Duration::from_millis(10)), None);
/// assert_eq!(throttle.observe(20, 100, start + Duration::from_millis(60)), Some(0.2));
/// assert_eq!(throttle.observe(100, 100, start + Duration::from_millis(61)), Some(1.0));
/// assert_eq!(throttle.finish(), None);
/// ```
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    interval: Duration,
    last_emit: Instant,
    last_fraction: f32,
    finished: bool,
}

impl ProgressThrottle {
    /// Start throttling; `started` is when 0.0 was reported.
    pub fn new(interval: Duration, started: Instant) -> Self {
        Self {
            interval,
            last_emit: started,
            last_fraction: 0.0,
            finished: false,
        }
    }

    /// Account for `sent` of `total` bytes at `now`; returns the fraction to
    /// report, if any.
    pub fn observe(&mut self, sent: u64, total: u64, now: Instant) -> Option<f32> {
        if self.finished {
            return None;
        }
        if sent >= total {
            return self.finish();
        }

        let fraction = (sent as f64 / total as f64) as f32;
        // Anything rounding up to 1.0 waits for the real end.
        if fraction >= 1.0 || fraction <= self.last_fraction {
            return None;
        }
        if now.saturating_duration_since(self.last_emit) < self.interval {
            return None;
        }

        self.last_emit = now;
        self.last_fraction = fraction;
        Some(fraction)
    }

    /// Report completion unless it was already reported.
    pub fn finish(&mut self) -> Option<f32> {
        if self.finished {
            return None;
        }
        self.finished = true;
        self.last_fraction = 1.0;
        Some(1.0)
    }
}

/// Write side of an upload's progress channel.
///
/// Every event goes to the ordered event stream; progress snapshots also
/// replace the value seen by subscribers.
#[derive(Debug, Clone)]
pub(crate) struct ProgressEmitter {
    events: mpsc::UnboundedSender<MosaicResult<UploadProgress>>,
    latest: Arc<watch::Sender<UploadProgress>>,
    reported_full: Arc<AtomicBool>,
}

impl ProgressEmitter {
    pub(crate) fn new(
        events: mpsc::UnboundedSender<MosaicResult<UploadProgress>>,
        latest: watch::Sender<UploadProgress>,
    ) -> Self {
        Self {
            events,
            latest: Arc::new(latest),
            reported_full: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn emit(&self, progress: UploadProgress) {
        trace!(%progress, "Progress");
        if progress.fraction() == Some(1.0) {
            self.reported_full.store(true, Ordering::SeqCst);
        }
        self.latest.send_replace(progress.clone());
        // Nobody listening is fine; the upload carries on.
        let _ = self.events.send(Ok(progress));
    }

    pub(crate) fn fraction(&self, fraction: f32) {
        self.emit(UploadProgress::InProgress { fraction });
    }

    /// Emit 1.0 if the body never got to report it.
    pub(crate) fn ensure_full(&self) {
        if !self.reported_full.load(Ordering::SeqCst) {
            self.fraction(1.0);
        }
    }

    pub(crate) fn fail(&self, error: mosaic_error::MosaicError) {
        let _ = self.events.send(Err(error));
    }
}

/// File body that reports progress as the transport pulls chunks.
pub(crate) struct ProgressBody {
    inner: ReaderStream<File>,
    sent: u64,
    total: u64,
    throttle: ProgressThrottle,
    emitter: ProgressEmitter,
}

impl ProgressBody {
    pub(crate) fn new(
        file: File,
        total: u64,
        chunk_size: usize,
        throttle: ProgressThrottle,
        emitter: ProgressEmitter,
    ) -> Self {
        Self {
            inner: ReaderStream::with_capacity(file, chunk_size.max(1)),
            sent: 0,
            total,
            throttle,
            emitter,
        }
    }
}

impl Stream for ProgressBody {
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
            Some(Ok(chunk)) => {
                this.sent += chunk.len() as u64;
                if let Some(fraction) = this.throttle.observe(this.sent, this.total, Instant::now())
                {
                    this.emitter.fraction(fraction);
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            Some(Err(e)) => Poll::Ready(Some(Err(e))),
            None => {
                if let Some(fraction) = this.throttle.finish() {
                    this.emitter.fraction(fraction);
                }
                Poll::Ready(None)
            }
        }
    }
}
