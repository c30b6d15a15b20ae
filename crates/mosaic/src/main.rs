//! Mosaic CLI binary.
//!
//! This binary provides command-line access to both client components:
//! - Build and inspect share references, stream shared media to a file
//! - Upload files, optionally as posts, and check the rate limit

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, handle_share_command, handle_upload_command};

    // Parse command-line arguments
    let cli = Cli::parse();

    mosaic::init_tracing(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => mosaic::MosaicConfig::from_file(path)?,
        None => mosaic::MosaicConfig::load()?,
    };

    // The share provider blocks its calling thread, so the runtime is built
    // by hand and commands run on the main thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Share(cmd) => handle_share_command(cmd, &config, runtime.handle())?,
        Commands::Upload(cmd) => handle_upload_command(cmd, &config, &runtime)?,
    }

    Ok(())
}
