// Tests for UploadPipeline using MockCommunityApi.
//
// The mock drains the streamed body like the real transport would, so
// progress reporting is exercised end to end without a server.

mod test_utils;

use futures_util::StreamExt;
use mosaic_core::{ContentRating, PostMetadata, UploadConfig, UploadProgress};
use mosaic_error::{MosaicResult, UploadErrorKind};
use mosaic_upload::{PNG_MAGIC, UploadPipeline, UploadStream};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{MockCommunityApi, PostBehavior, UploadBehavior, write_file};

fn pipeline(api: &Arc<MockCommunityApi>) -> UploadPipeline {
    let config = UploadConfig::default()
        .with_chunk_size(1024)
        .with_progress_interval(Duration::from_millis(1));
    UploadPipeline::new(api.clone(), config)
}

async fn drain(stream: UploadStream) -> Vec<MosaicResult<UploadProgress>> {
    stream.collect().await
}

fn fractions(events: &[MosaicResult<UploadProgress>]) -> Vec<f32> {
    events
        .iter()
        .filter_map(|event| event.as_ref().ok().and_then(UploadProgress::fraction))
        .collect()
}

#[tokio::test]
async fn test_progress_is_monotonic_and_ends_with_uploaded() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let contents: Vec<u8> = (0..64 * 1024).map(|i| (i % 251) as u8).collect();
    let path = write_file(dir.path(), "photo.jpg", &contents);
    let api = Arc::new(MockCommunityApi::accepting("key-1").with_chunk_delay(Duration::from_millis(1)));

    let events = drain(pipeline(&api).upload(&path).await?).await;

    let progress = fractions(&events);
    assert_eq!(progress.first(), Some(&0.0));
    assert_eq!(progress.last(), Some(&1.0));
    assert!(progress.len() > 2, "expected intermediate progress: {:?}", progress);
    assert!(progress.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(progress.iter().filter(|f| **f == 1.0).count(), 1);

    let last = events.last().unwrap().as_ref().unwrap();
    assert_eq!(last.remote_key(), Some("key-1"));
    assert_eq!(events.iter().filter(|e| e.is_err()).count(), 0);

    let uploads = api.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].file_name, "photo.jpg");
    assert_eq!(uploads[0].mime_type, "image/jpeg");
    assert_eq!(uploads[0].length, contents.len() as u64);
    assert_eq!(uploads[0].bytes, contents);
    Ok(())
}

#[tokio::test]
async fn test_png_is_sniffed() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut contents = PNG_MAGIC.to_vec();
    contents.extend_from_slice(b"\r\n\x1a\nrest of image");
    // Name says jpg, bytes say png
    let path = write_file(dir.path(), "really.jpg", &contents);
    let api = Arc::new(MockCommunityApi::accepting("key-png"));

    drain(pipeline(&api).upload(&path).await?).await;

    assert_eq!(api.uploads()[0].mime_type, "image/png");
    assert_eq!(api.uploads()[0].bytes, contents);
    Ok(())
}

#[tokio::test]
async fn test_empty_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "empty.jpg", b"");
    let api = Arc::new(MockCommunityApi::accepting("key-empty"));

    let events = drain(pipeline(&api).upload(&path).await?).await;

    assert_eq!(fractions(&events), vec![0.0, 1.0]);
    assert_eq!(events.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_unavailable_files_fail_fast() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let api = Arc::new(MockCommunityApi::accepting("unused"));
    let pipeline = pipeline(&api);

    let missing = pipeline.upload(dir.path().join("missing.png")).await.unwrap_err();
    assert!(matches!(
        missing.upload_kind(),
        Some(UploadErrorKind::FileUnavailable(_))
    ));

    let directory = pipeline.upload(dir.path()).await.unwrap_err();
    assert!(matches!(
        directory.upload_kind(),
        Some(UploadErrorKind::FileUnavailable(_))
    ));

    let metadata = PostMetadata::new(ContentRating::Safe, ["cats"]);
    assert!(
        pipeline
            .upload_and_post(dir.path().join("missing.png"), metadata)
            .await
            .is_err()
    );

    assert!(api.uploads().is_empty());
    assert!(api.posts().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_upload_and_post_completes() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "cat.jpg", &[0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3]);
    let api = Arc::new(MockCommunityApi::accepting("key-7"));
    let metadata = PostMetadata::new(ContentRating::Safe, ["SFW", "tag1", "NSFW", "tag1"]);

    let events = drain(pipeline(&api).upload_and_post(&path, metadata).await?).await;
    let events: Vec<UploadProgress> = events.into_iter().collect::<Result<_, _>>()?;

    let n = events.len();
    assert_eq!(events[n - 3].fraction(), Some(1.0));
    assert_eq!(events[n - 2].remote_key(), Some("key-7"));
    assert_eq!(events[n - 1], UploadProgress::Completed { post_id: 42 });

    let posts = api.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content_type(), "safe");
    assert_eq!(posts[0].tags(), "tag1,safe");
    assert_eq!(posts[0].content_source_key(), "key-7");
    Ok(())
}

#[tokio::test]
async fn test_upload_failure_skips_post() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "cat.jpg", b"jpeg bytes");
    let api = Arc::new(MockCommunityApi::accepting("unused").with_upload(UploadBehavior::Fail(500)));
    let metadata = PostMetadata::new(ContentRating::NotSafe, ["cats"]);

    let events = drain(pipeline(&api).upload_and_post(&path, metadata).await?).await;

    let err = events.last().unwrap().as_ref().unwrap_err();
    assert_eq!(err.http_status(), Some(500));
    assert!(events.iter().all(|e| e.as_ref().map_or(true, |p| p.remote_key().is_none())));
    assert!(api.posts().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_post_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "cat.jpg", b"jpeg bytes");
    let api = Arc::new(
        MockCommunityApi::accepting("key-1").with_post(PostBehavior::Reject("duplicate".to_string())),
    );
    let metadata = PostMetadata::new(ContentRating::Safe, ["cats"]);

    let events = drain(pipeline(&api).upload_and_post(&path, metadata).await?).await;

    let err = events.last().unwrap().as_ref().unwrap_err();
    assert_eq!(
        err.upload_kind(),
        Some(&UploadErrorKind::PostRejected("duplicate".to_string()))
    );
    // The upload itself went through
    assert!(events.iter().any(|e| matches!(e, Ok(UploadProgress::Uploaded { .. }))));
    Ok(())
}

#[tokio::test]
async fn test_submit_post_directly() -> anyhow::Result<()> {
    let api = Arc::new(MockCommunityApi::accepting("unused").with_post(PostBehavior::Accept(0)));
    let metadata = PostMetadata::new(ContentRating::NotSafeAndLewd, ["gore", "gif"]);

    let err = pipeline(&api).submit_post("key-9", &metadata).await.unwrap_err();

    assert!(matches!(
        err.upload_kind(),
        Some(UploadErrorKind::InvalidResponse(_))
    ));
    assert_eq!(api.posts()[0].tags(), "gore,nsfl");
    Ok(())
}

#[tokio::test]
async fn test_post_transport_error_propagates() -> anyhow::Result<()> {
    let api = Arc::new(MockCommunityApi::accepting("unused").with_post(PostBehavior::Fail(502)));
    let metadata = PostMetadata::new(ContentRating::Safe, Vec::<String>::new());

    let err = pipeline(&api).submit_post("key", &metadata).await.unwrap_err();

    assert_eq!(err.http_status(), Some(502));
    Ok(())
}

#[tokio::test]
async fn test_rate_limit_check() -> anyhow::Result<()> {
    let open = Arc::new(MockCommunityApi::accepting("unused"));
    assert!(!pipeline(&open).check_rate_limited().await?);

    let limited = Arc::new(MockCommunityApi::accepting("unused").with_rate_limit_status(403));
    assert!(pipeline(&limited).check_rate_limited().await?);

    let broken = Arc::new(MockCommunityApi::accepting("unused").with_rate_limit_status(500));
    let err = pipeline(&broken).check_rate_limited().await.unwrap_err();
    assert_eq!(err.http_status(), Some(500));
    Ok(())
}

#[tokio::test]
async fn test_cancel_aborts_upload_and_skips_post() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "cat.jpg", b"jpeg bytes");
    let api = Arc::new(MockCommunityApi::accepting("unused").with_upload(UploadBehavior::Hang));
    let metadata = PostMetadata::new(ContentRating::Safe, ["cats"]);

    let mut stream = pipeline(&api).upload_and_post(&path, metadata).await?;
    let first = stream.next().await.unwrap()?;
    assert_eq!(first.fraction(), Some(0.0));

    stream.cancel();
    let terminal = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await?
        .unwrap();
    assert_eq!(
        terminal.unwrap_err().upload_kind(),
        Some(&UploadErrorKind::Cancelled)
    );
    assert!(stream.next().await.is_none());
    assert!(api.posts().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_subscribe_replays_latest() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "cat.jpg", b"jpeg bytes");
    let api = Arc::new(MockCommunityApi::accepting("key-3"));

    let mut stream = pipeline(&api)
        .upload_and_post(&path, PostMetadata::new(ContentRating::Safe, ["cats"]))
        .await?;
    assert_eq!(
        *stream.subscribe().borrow(),
        UploadProgress::InProgress { fraction: 0.0 }
    );

    while let Some(event) = stream.next().await {
        event?;
    }

    // A late subscriber still sees the final state
    let late = stream.subscribe();
    assert_eq!(*late.borrow(), UploadProgress::Completed { post_id: 42 });
    Ok(())
}
