//! Configuration types and defaults

use std::time::Duration;

use watchfeed_media::{CaptureConfig, DEFAULT_JPEG_QUALITY};

use crate::error::WatchFeedError;

/// Interval between frame uploads
pub const DEFAULT_UPLOAD_INTERVAL: Duration = Duration::from_millis(250);

/// Configuration for a feed session
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Camera capture configuration
    pub capture: CaptureConfig,
    /// Interval between frame uploads
    pub upload_interval: Duration,
    /// JPEG quality for uploaded frames (1-100)
    pub jpeg_quality: u8,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            upload_interval: DEFAULT_UPLOAD_INTERVAL,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl FeedConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), WatchFeedError> {
        self.capture.validate().map_err(WatchFeedError::from)?;

        if self.upload_interval.is_zero() {
            return Err(WatchFeedError::Initialization {
                reason: "Upload interval must be non-zero".to_string(),
            });
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(WatchFeedError::Initialization {
                reason: format!("JPEG quality must be 1-100, got {}", self.jpeg_quality),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FeedConfig::default();
        assert_eq!(config.upload_interval, Duration::from_millis(250));
        assert_eq!(config.jpeg_quality, 60);
        assert_eq!(config.capture.resolution.width, 480);
        assert_eq!(config.capture.resolution.height, 360);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_interval() {
        let config = FeedConfig {
            upload_interval: Duration::ZERO,
            ..FeedConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_quality() {
        let config = FeedConfig {
            jpeg_quality: 0,
            ..FeedConfig::default()
        };
        assert!(config.validate().is_err());

        let config = FeedConfig {
            jpeg_quality: 101,
            ..FeedConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
