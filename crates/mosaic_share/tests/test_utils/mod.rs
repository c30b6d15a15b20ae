//! Test utilities for share provider tests.
//!
//! This module provides a scripted [`MediaFetcher`] so tests never touch the
//! network.

use bytes::Bytes;
use futures_util::StreamExt;
use mosaic_error::{HttpError, MosaicResult};
use mosaic_share::{MediaBody, MediaFetcher};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// How the mock answers size lookups.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum MockLength {
    /// Announce a length
    Known(u64),
    /// No length header
    Unknown,
    /// HEAD request fails
    Fail,
}

/// Scripted media fetcher.
#[derive(Debug, Clone)]
pub struct MockFetcher {
    length: MockLength,
    chunks: Vec<Bytes>,
    fail_after: Option<usize>,
    fail_fetch: bool,
    length_calls: Arc<AtomicUsize>,
    fetch_calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockFetcher {
    /// Serve `chunks` with a matching content length.
    pub fn serving(chunks: &[&[u8]]) -> Self {
        let chunks: Vec<Bytes> = chunks.iter().map(|c| Bytes::copy_from_slice(c)).collect();
        let total = chunks.iter().map(|c| c.len() as u64).sum();
        Self {
            length: MockLength::Known(total),
            chunks,
            fail_after: None,
            fail_fetch: false,
            length_calls: Arc::new(AtomicUsize::new(0)),
            fetch_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Override the size lookup behavior.
    pub fn with_length(mut self, length: MockLength) -> Self {
        self.length = length;
        self
    }

    /// Fail the body after `n` chunks were delivered.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Fail before any body is produced.
    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    /// Number of size lookups performed.
    pub fn length_calls(&self) -> usize {
        self.length_calls.load(Ordering::SeqCst)
    }

    /// Number of downloads started.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MediaFetcher for MockFetcher {
    async fn content_length(&self, _url: &str) -> MosaicResult<Option<u64>> {
        self.length_calls.fetch_add(1, Ordering::SeqCst);
        match self.length {
            MockLength::Known(n) => Ok(Some(n)),
            MockLength::Unknown => Ok(None),
            MockLength::Fail => Err(HttpError::with_status(500, "HEAD failed").into()),
        }
    }

    async fn fetch(&self, url: &str) -> MosaicResult<MediaBody> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch {
            return Err(HttpError::with_status(404, format!("404 for {}", url)).into());
        }

        let mut items: Vec<MosaicResult<Bytes>> = Vec::new();
        for (idx, chunk) in self.chunks.iter().enumerate() {
            if self.fail_after == Some(idx) {
                items.push(Err(HttpError::new("connection reset").into()));
                break;
            }
            items.push(Ok(chunk.clone()));
        }
        if self.fail_after.is_some_and(|n| n >= self.chunks.len()) {
            items.push(Err(HttpError::new("connection reset").into()));
        }

        Ok(futures_util::stream::iter(items).boxed())
    }
}
