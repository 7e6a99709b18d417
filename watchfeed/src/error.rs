//! Error types for watchfeed sessions

use thiserror::Error;
use watchfeed_client::ClientError;
use watchfeed_media::MediaError;

/// Main error type for watchfeed operations
#[derive(Error, Debug)]
pub enum WatchFeedError {
    /// Initialization error
    #[error("Initialization failed: {reason}")]
    Initialization {
        /// Reason for initialization failure
        reason: String,
    },

    /// Missing configuration error
    #[error("Missing required configuration: {field}")]
    MissingConfiguration {
        /// Missing configuration field
        field: String,
    },

    /// Camera capture error
    ///
    /// Acquisition failures are fatal to the session; there is no retry.
    #[error("Camera error: {source}")]
    Camera {
        /// Underlying media error
        #[from]
        source: MediaError,
    },

    /// Analysis backend error
    #[error("Backend error: {source}")]
    Backend {
        /// Underlying client error
        #[from]
        source: ClientError,
    },

    /// Invalid state for operation
    #[error("Invalid state: expected {expected}, got {actual}")]
    InvalidState {
        /// Expected state
        expected: String,
        /// Actual state
        actual: String,
    },
}
