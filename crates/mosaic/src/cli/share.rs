//! Share provider command handlers.

use super::CliResult;
use super::commands::{OutputFormat, ShareCommands};
use mosaic::{
    ColumnValue, HttpMediaFetcher, MediaReference, MediaStreamProvider, MosaicConfig,
    MosaicResult, SHARE_SCHEME, build_http_client,
};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

/// Handle share provider commands.
///
/// Runs on a plain thread; the provider drives its downloads on `runtime`.
pub fn handle_share_command(cmd: ShareCommands, config: &MosaicConfig, runtime: &Handle) -> CliResult {
    let client = build_http_client(config.api())?;
    let fetcher = Arc::new(HttpMediaFetcher::new(client));
    let provider = MediaStreamProvider::new(fetcher, runtime.clone(), config.share().clone());

    match cmd {
        ShareCommands::ShareUri { url } => {
            println!("{}", provider.share_uri(&url)?);
            Ok(())
        }
        ShareCommands::Inspect { reference, format } => inspect(&provider, &reference, format),
        ShareCommands::Fetch { reference, output } => fetch(&provider, &reference, output.as_deref()),
    }
}

/// Accept either a full share URI or a bare encoded id.
fn parse_reference(reference: &str) -> MosaicResult<MediaReference> {
    if reference.starts_with(&format!("{}://", SHARE_SCHEME)) {
        MediaReference::from_uri(reference)
    } else {
        MediaReference::from_encoded(reference)
    }
}

fn inspect(provider: &MediaStreamProvider, reference: &str, format: OutputFormat) -> CliResult {
    let reference = parse_reference(reference)?;
    let row = provider.query(reference.encoded_id(), None)?;
    let mime_type = provider.resolve_mime_type(reference.encoded_id())?;

    match format {
        OutputFormat::Json => {
            let mut object = serde_json::Map::new();
            object.insert("url".into(), reference.remote_url().clone().into());
            object.insert("mime_type".into(), mime_type.into());
            for (column, value) in row.columns().iter().zip(row.values()) {
                let value = match value {
                    ColumnValue::Text(text) => serde_json::Value::from(text.clone()),
                    ColumnValue::Integer(n) => serde_json::Value::from(*n),
                    ColumnValue::Null => serde_json::Value::Null,
                };
                object.insert(column.clone(), value);
            }
            println!("{}", serde_json::to_string_pretty(&object)?);
        }
        OutputFormat::Human => {
            println!("URL:       {}", reference.remote_url());
            println!("Type:      {}", mime_type.unwrap_or("unknown"));
            for (column, value) in row.columns().iter().zip(row.values()) {
                let value = match value {
                    ColumnValue::Text(text) => text.clone(),
                    ColumnValue::Integer(n) => n.to_string(),
                    ColumnValue::Null => "unknown".to_string(),
                };
                println!("{:<10} {}", format!("{}:", column.trim_start_matches('_')), value);
            }
        }
    }

    Ok(())
}

fn fetch(provider: &MediaStreamProvider, reference: &str, output: Option<&Path>) -> CliResult {
    let reference = parse_reference(reference)?;
    let mut stream = provider.open_stream(reference.encoded_id())?;

    let copied = match output {
        Some(path) => {
            let mut file = File::create(path)?;
            let copied = io::copy(&mut stream, &mut file)?;
            file.flush()?;
            copied
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            let copied = io::copy(&mut stream, &mut lock)?;
            lock.flush()?;
            copied
        }
    };

    info!(bytes = copied, url = %reference.remote_url(), "Fetched shared media");
    Ok(())
}
