//! Custom error types for dblp-venues.
//!
//! All library functions return `Result<T, DblpError>`. Transport failures are
//! classified as retryable or fatal so the harvest loops can decide whether to
//! try again or record the query as failed and move on.

use thiserror::Error;

/// Main error type for dblp-venues operations.
#[derive(Debug, Error)]
pub enum DblpError {
    /// Network/HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request did not complete in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {url}")]
    Http {
        /// Status code returned by the server
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl DblpError {
    /// Whether a later attempt of the same request may succeed.
    ///
    /// Timeouts, connection failures, 5xx and 429 are retryable. Other 4xx
    /// responses, malformed URLs and everything that is not transport related
    /// are fatal.
    pub fn is_retryable(&self) -> bool {
        match self {
            DblpError::Timeout(_) => true,
            DblpError::Http { status, .. } => *status == 429 || (500..600).contains(status),
            DblpError::Network(e) => {
                if e.is_builder() || e.is_redirect() || e.is_decode() {
                    return false;
                }
                match e.status() {
                    Some(status) => status.is_server_error() || status.as_u16() == 429,
                    None => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
                }
            }
            _ => false,
        }
    }
}

/// Result type alias using `DblpError`
pub type Result<T> = std::result::Result<T, DblpError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a parse error message
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| DblpError::Parse(msg.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> DblpError {
        DblpError::Http {
            status,
            url: "https://dblp.org/search/publ/api".to_string(),
        }
    }

    #[test]
    fn test_server_errors_are_retryable() {
        assert!(http(500).is_retryable());
        assert!(http(503).is_retryable());
        assert!(http(429).is_retryable());
        assert!(DblpError::Timeout("30s".to_string()).is_retryable());
    }

    #[test]
    fn test_client_errors_are_fatal() {
        assert!(!http(404).is_retryable());
        assert!(!http(400).is_retryable());
        assert!(!DblpError::Parse("bad".to_string()).is_retryable());
        assert!(!DblpError::Config("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_ok_or_parse() {
        let missing: Option<u32> = None;
        let err = missing.ok_or_parse("no total").err();
        assert!(matches!(err, Some(DblpError::Parse(msg)) if msg == "no total"));
    }
}
