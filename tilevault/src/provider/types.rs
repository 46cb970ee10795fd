//! Provider error types.

use thiserror::Error;

/// Errors surfaced by the remote tile source.
///
/// Every variant is transient from the engine's point of view: the fetcher
/// retries them all and downgrades exhaustion to a recorded failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Transport-level failure (connect error, timeout, body read error)
    #[error("Request failed: {0}")]
    HttpError(String),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// URL template is missing a required placeholder
    #[error("Invalid URL template: {0}")]
    InvalidTemplate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = ProviderError::HttpError("connection refused".to_string());
        assert_eq!(err.to_string(), "Request failed: connection refused");
    }

    #[test]
    fn test_http_status_display() {
        let err = ProviderError::HttpStatus {
            status: 503,
            url: "http://tiles.test/13/1/2.png".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 from http://tiles.test/13/1/2.png");
    }

    #[test]
    fn test_error_trait() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<ProviderError>();
    }
}
