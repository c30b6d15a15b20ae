//! Configuration error types.

use std::fmt;

/// Failure to read or deserialize the layered `mosaic.toml` configuration.
///
/// `path` names the configuration file involved, when one is known. Errors
/// raised while merging the bundled defaults with user overrides carry none.
#[derive(Debug, Clone, derive_more::Error)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Configuration file that failed to load
    pub path: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a ConfigError for the merged configuration at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use mosaic_error::ConfigError;
    ///
    /// let err = ConfigError::new("missing field `base_url` in [api]");
    /// assert!(err.message.contains("base_url"));
    /// assert_eq!(err.path, None);
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            path: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a ConfigError for an explicitly named configuration file.
    ///
    /// # Examples
    ///
    /// ```
    /// use mosaic_error::ConfigError;
    ///
    /// let err = ConfigError::in_file("/etc/mosaic/mosaic.toml", "unknown rating `spicy`");
    /// assert_eq!(err.path.as_deref(), Some("/etc/mosaic/mosaic.toml"));
    /// assert!(err.to_string().contains("in /etc/mosaic/mosaic.toml: unknown rating"));
    /// ```
    #[track_caller]
    pub fn in_file(path: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            path: Some(path.into()),
            line: location.line(),
            file: location.file(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "Configuration Error in {}: {}", path, self.message)?,
            None => write!(f, "Configuration Error: {}", self.message)?,
        }
        write!(f, " at line {} in {}", self.line, self.file)
    }
}
