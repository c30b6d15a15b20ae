//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the mosaic binary.

mod commands;
mod share;
mod upload;

pub use commands::{Cli, Commands};
pub use share::handle_share_command;
pub use upload::handle_upload_command;

/// Result of a command handler.
pub type CliResult = Result<(), Box<dyn std::error::Error>>;
