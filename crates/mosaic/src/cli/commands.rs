//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use mosaic::ContentRating;
use std::path::PathBuf;

/// Mosaic - share and upload media for an image and video community
#[derive(Parser, Debug)]
#[command(name = "mosaic")]
#[command(about = "Share and upload media for an image and video community", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Load configuration from this file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Share provider commands
    #[command(flatten)]
    Share(ShareCommands),

    /// Upload commands
    #[command(flatten)]
    Upload(UploadCommands),
}

/// Share provider subcommands
#[derive(Subcommand, Debug)]
pub enum ShareCommands {
    /// Print the share URI for a remote media URL
    ShareUri {
        /// Remote media URL
        url: String,
    },

    /// Show name, size and type of a shared item
    Inspect {
        /// Share URI or bare encoded id
        reference: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Stream a shared item to a file or stdout
    Fetch {
        /// Share URI or bare encoded id
        reference: String,

        /// Destination file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Upload subcommands
#[derive(Subcommand, Debug)]
pub enum UploadCommands {
    /// Upload a file and publish it as a post
    Upload {
        /// Image or video file to upload
        file: PathBuf,

        /// Content rating (safe, nsfw, nsfl)
        #[arg(long, default_value = "safe")]
        rating: ContentRating,

        /// Tag to attach; repeat for several
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Stop after the upload, without creating a post
        #[arg(long)]
        no_post: bool,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Check whether the account is rate limited
    RateLimit,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
