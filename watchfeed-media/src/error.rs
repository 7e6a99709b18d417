//! Media error types and handling
//!
//! This module defines all error types used by the capture and encoding
//! layers, providing clear error messages for debugging and error handling.

use thiserror::Error;

/// Main error type for media operations
#[derive(Error, Debug)]
pub enum MediaError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Invalid configuration provided
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },

    /// Device enumeration failed
    #[error("Device enumeration failed: {reason}")]
    DeviceEnumerationFailed {
        /// Failure reason
        reason: String,
    },

    /// Camera device not found
    #[error("Device not found: {device}")]
    DeviceNotFound {
        /// Device identifier
        device: String,
    },

    /// Camera could not be acquired
    #[error("Camera acquisition failed: {reason}")]
    CameraAcquisition {
        /// Failure reason
        reason: String,
    },

    /// Capture not active
    #[error("Capture not active")]
    CaptureNotActive,

    /// Frame capture failed
    #[error("Capture failed: {reason}")]
    CaptureFailed {
        /// Failure reason
        reason: String,
    },

    /// JPEG encoding failed
    #[error("Encoding failed: {reason}")]
    EncodingFailed {
        /// Failure reason
        reason: String,
    },

    /// Data URI could not be parsed
    #[error("Invalid data URI: {reason}")]
    InvalidDataUri {
        /// Failure reason
        reason: String,
    },

    /// Invalid frame data
    #[error("Invalid frame data: expected {expected} bytes, got {actual}")]
    InvalidFrameData {
        /// Expected data size
        expected: usize,
        /// Actual data size
        actual: usize,
    },
}

/// Result type alias for media operations
pub type MediaResult<T> = Result<T, MediaError>;

impl MediaError {
    /// Check if error is recoverable
    ///
    /// Camera acquisition is fatal to a session; a failed frame grab or
    /// encode is transient and the next tick retries implicitly.
    pub fn is_recoverable(&self) -> bool {
        match self {
            MediaError::Io { .. } => true,
            MediaError::CaptureFailed { .. } => true,
            MediaError::EncodingFailed { .. } => true,
            MediaError::CameraAcquisition { .. } => false,
            MediaError::DeviceNotFound { .. } => false,
            MediaError::DeviceEnumerationFailed { .. } => false,
            MediaError::InvalidConfiguration { .. } => false,
            _ => false,
        }
    }
}
