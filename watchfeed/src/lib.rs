//! # watchfeed - Surveillance Feed Capture Client
//!
//! watchfeed is a capture-and-upload client for a camera surveillance
//! analysis backend: it grabs webcam frames on a fixed cadence, uploads
//! them as JPEG data URIs, and surfaces the annotated frames and threat
//! status the backend returns. Ending a session releases the camera and
//! fetches a one-shot motion-heatmap summary.
//!
//! ## Key Features
//!
//! - **Fixed-cadence upload loop**: one frame every 250 ms by default,
//!   with slow replies never stalling the cadence
//! - **Two-phase sessions**: `Capturing` to `Ended`, one way; replies
//!   arriving after the end are discarded
//! - **UI-agnostic view**: the processed image, threat banner, and final
//!   heatmap are exposed as a snapshot plus an event stream
//! - **Pluggable frame sources**: real cameras via nokhwa, or a mock
//!   source for tests and headless runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use watchfeed::WatchFeed;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Initialize watchfeed
//!     let watchfeed = WatchFeed::init()?;
//!
//!     // Start capturing and uploading to the analysis backend
//!     let mut feed = watchfeed
//!         .feed("http://127.0.0.1:5000")
//!         .camera(0)
//!         .resolution(480, 360)
//!         .start().await?;
//!
//!     // Handle events
//!     let mut events = feed.events();
//!     while let Some(event) = events.next().await {
//!         println!("Feed event: {}", event.event_type());
//!     }
//!
//!     // End the session and fetch the motion heatmap
//!     let summary = feed.end().await?;
//!     println!("Heatmap: {} bytes", summary.heatmap_image.len());
//!
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export wire and media types for easy access
pub use watchfeed_client::{
    AnalysisClient, AnalysisResult, ClientError, FeedSummary, FrameUpload, ThreatStatus,
};
pub use watchfeed_media::{
    enumerate_devices, CaptureBackend, CaptureConfig, CaptureDevice, CaptureSource, MediaError,
    MockCapture, Resolution, VideoFrame,
};

// Public API modules
pub mod config;
pub mod error;
pub mod event;
pub mod session;

// Re-export main API types
pub use config::{FeedConfig, DEFAULT_UPLOAD_INTERVAL};
pub use error::WatchFeedError;
pub use event::{EventStream, FeedEvent};
pub use session::{FeedPhase, FeedSession, FeedSessionBuilder, FeedStats, FeedView, ViewLabel};

/// Main entry point for watchfeed
#[derive(Debug, Clone)]
pub struct WatchFeed {
    config: FeedConfig,
}

impl WatchFeed {
    /// Initialize watchfeed with default settings
    ///
    /// # Example
    /// ```rust,no_run
    /// use watchfeed::WatchFeed;
    ///
    /// let watchfeed = WatchFeed::init()?;
    /// # Ok::<(), watchfeed::WatchFeedError>(())
    /// ```
    pub fn init() -> Result<Self, WatchFeedError> {
        Self::init_with(FeedConfig::default())
    }

    /// Initialize with a custom default configuration
    pub fn init_with(config: FeedConfig) -> Result<Self, WatchFeedError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a feed session builder for the backend at `base_url`
    ///
    /// # Example
    /// ```rust,no_run
    /// use watchfeed::WatchFeed;
    ///
    /// # async fn example() -> Result<(), watchfeed::WatchFeedError> {
    /// let watchfeed = WatchFeed::init()?;
    /// let feed = watchfeed
    ///     .feed("http://127.0.0.1:5000")
    ///     .mock_camera()
    ///     .start().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn feed(&self, base_url: &str) -> FeedSessionBuilder {
        FeedSessionBuilder::new(base_url, self.config.clone())
    }
}
