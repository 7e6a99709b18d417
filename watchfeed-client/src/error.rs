//! Error types for the analysis client

use thiserror::Error;

/// Main error type for analysis backend requests
#[derive(Error, Debug)]
pub enum ClientError {
    /// Base URL could not be parsed or joined
    #[error("Invalid endpoint URL: {reason}")]
    InvalidUrl {
        /// Failure reason
        reason: String,
    },

    /// Request could not be sent or the connection failed
    #[error("HTTP transport error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("Unexpected status {status} from {endpoint}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Endpoint path that failed
        endpoint: String,
    },

    /// Response body was not the expected JSON shape
    #[error("Invalid response body from {endpoint}: {reason}")]
    InvalidBody {
        /// Endpoint path that failed
        endpoint: String,
        /// Failure reason
        reason: String,
    },
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ClientError::UnexpectedStatus {
            status: 503,
            endpoint: "/upload".to_string(),
        };
        assert_eq!(error.to_string(), "Unexpected status 503 from /upload");
    }
}
