//! JSON error types.

use std::fmt;

/// Response body of a community API endpoint that did not decode.
#[derive(Debug, Clone, derive_more::Error)]
pub struct JsonError {
    /// The underlying error message
    pub message: String,
    /// API path whose response was being decoded, such as `/api/items/post`
    pub endpoint: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a JsonError that is not tied to an endpoint.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            endpoint: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a JsonError for the response of `endpoint`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mosaic_error::JsonError;
    ///
    /// let err = JsonError::for_endpoint("/api/items/upload", "missing field `key`");
    /// assert_eq!(err.endpoint.as_deref(), Some("/api/items/upload"));
    /// assert!(err.to_string().contains("response of /api/items/upload: missing field `key`"));
    /// ```
    #[track_caller]
    pub fn for_endpoint(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            endpoint: Some(endpoint.into()),
            line: location.line(),
            file: location.file(),
        }
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.endpoint {
            Some(endpoint) => write!(
                f,
                "JSON Error: malformed response of {}: {}",
                endpoint, self.message
            )?,
            None => write!(f, "JSON Error: {}", self.message)?,
        }
        write!(f, " at line {} in {}", self.line, self.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_error_names_the_endpoint() {
        let err = JsonError::for_endpoint("/api/items/post", "invalid type: string, expected u64");
        assert!(err.to_string().starts_with(
            "JSON Error: malformed response of /api/items/post: invalid type: string, expected u64 at line"
        ));
    }

    #[test]
    fn test_plain_error() {
        let err = JsonError::new("expected value");
        assert!(err.to_string().starts_with("JSON Error: expected value at line"));
        assert!(err.endpoint.is_none());
    }
}
