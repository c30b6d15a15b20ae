//! Upload command handlers.

use super::CliResult;
use super::commands::{OutputFormat, UploadCommands};
use futures_util::StreamExt;
use mosaic::{
    HttpCommunityApi, MosaicConfig, PostMetadata, UploadPipeline, UploadStream, build_http_client,
};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Handle upload commands.
pub fn handle_upload_command(cmd: UploadCommands, config: &MosaicConfig, runtime: &Runtime) -> CliResult {
    let client = build_http_client(config.api())?;
    let api = Arc::new(HttpCommunityApi::new(client, config.api().clone()));
    let pipeline = UploadPipeline::new(api, config.upload().clone());

    runtime.block_on(run(cmd, &pipeline))
}

async fn run(cmd: UploadCommands, pipeline: &UploadPipeline) -> CliResult {
    match cmd {
        UploadCommands::Upload {
            file,
            rating,
            tags,
            no_post,
            format,
        } => {
            let events = if no_post {
                pipeline.upload(&file).await?
            } else {
                pipeline
                    .upload_and_post(&file, PostMetadata::new(rating, tags))
                    .await?
            };
            report(events, format).await
        }
        UploadCommands::RateLimit => {
            let limited = pipeline.check_rate_limited().await?;
            println!("{}", if limited { "rate limited" } else { "not rate limited" });
            Ok(())
        }
    }
}

/// Print every event; Ctrl-C cancels the upload.
async fn report(mut events: UploadStream, format: OutputFormat) -> CliResult {
    let cancel = events.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    while let Some(event) = events.next().await {
        let progress = event?;
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&progress)?),
            OutputFormat::Human => println!("{}", progress),
        }
    }

    Ok(())
}
