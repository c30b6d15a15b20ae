//! Client configuration.
//!
//! Configuration is layered with the `config` crate:
//! - Bundled defaults (include_str! from mosaic.toml)
//! - User overrides (~/.config/mosaic/mosaic.toml, then ./mosaic.toml)
//!
//! Later sources override earlier ones field by field.

use config::{Config, File, FileFormat};
use derive_getters::Getters;
use mosaic_error::{ConfigError, MosaicError, MosaicResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Remote API settings.
///
/// ```toml
/// [api]
/// base_url = "https://mosaic.example.com"
/// user_agent = "mosaic/0.1"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the community API, without trailing slash
    base_url: String,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    user_agent: String,
    /// Whole-request timeout in seconds, applied to API calls
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

impl ApiConfig {
    /// Create an API configuration pointing at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Absolute URL for an API path such as `/api/items/upload`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("https://mosaic.example.com")
    }
}

/// Share provider settings.
///
/// ```toml
/// [share]
/// authority = "com.example.mosaic.ShareProvider"
/// pipe_capacity = 16
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ShareConfig {
    /// `<app-id>.<provider-name>` authority of share URIs
    authority: String,
    /// Chunks buffered between the fetch task and the reader
    #[serde(default = "default_pipe_capacity")]
    pipe_capacity: usize,
}

impl ShareConfig {
    /// Create a share configuration for `authority`.
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            pipe_capacity: default_pipe_capacity(),
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self::new("com.example.mosaic.ShareProvider")
    }
}

/// Upload pipeline settings.
///
/// ```toml
/// [upload]
/// progress_interval_ms = 50
/// chunk_size = 16384
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Minimum spacing between two progress snapshots
    #[serde(default = "default_progress_interval_ms")]
    progress_interval_ms: u64,
    /// Read buffer size when streaming the file
    #[serde(default = "default_chunk_size")]
    chunk_size: usize,
}

impl UploadConfig {
    /// Progress throttle interval as a duration.
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    /// Override the throttle interval.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Override the read buffer size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            progress_interval_ms: default_progress_interval_ms(),
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_user_agent() -> String {
    format!("mosaic/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_pipe_capacity() -> usize {
    16
}

fn default_progress_interval_ms() -> u64 {
    50
}

fn default_chunk_size() -> usize {
    16 * 1024
}

/// Top-level Mosaic configuration.
///
/// # Example
///
/// ```no_run
/// use mosaic_core::MosaicConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MosaicConfig::load()?;
/// println!("API: {}", config.api().base_url());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters, Serialize, Deserialize)]
pub struct MosaicConfig {
    /// Remote API settings
    #[serde(default)]
    api: ApiConfig,
    /// Share provider settings
    #[serde(default)]
    share: ShareConfig,
    /// Upload pipeline settings
    #[serde(default)]
    upload: UploadConfig,
}

impl MosaicConfig {
    /// Assemble a configuration from its sections.
    pub fn new(api: ApiConfig, share: ShareConfig, upload: UploadConfig) -> Self {
        Self { api, share, upload }
    }

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> MosaicResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                MosaicError::from(ConfigError::in_file(
                    path.as_ref().display().to_string(),
                    format!("Failed to read configuration: {}", e),
                ))
            })?
            .try_deserialize()
            .map_err(|e| {
                MosaicError::from(ConfigError::in_file(
                    path.as_ref().display().to_string(),
                    format!("Failed to parse configuration: {}", e),
                ))
            })
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> MosaicResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../mosaic.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/mosaic/mosaic.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("mosaic").required(false));

        builder
            .build()
            .map_err(|e| {
                MosaicError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                MosaicError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
