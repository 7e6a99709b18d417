//! Camera capture backends and the owning capture handle
//!
//! A [`CaptureBackend`] abstracts over the actual frame source: the
//! `webcam` backend drives a real device through `nokhwa`, while the
//! `mock` backend synthesises frames for tests and headless runs.
//! [`CameraCapture`] owns whichever backend was selected and guarantees
//! the device is released exactly once.

pub mod mock;
pub mod webcam;

use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};
use crate::frame::VideoFrame;

pub use mock::MockCapture;
pub use webcam::{enumerate_devices, WebcamCapture};

/// Frame dimensions requested from the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    /// Create a new resolution
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Default feed resolution requested from the camera
    pub const FEED: Self = Self::new(480, 360);
    /// VGA resolution
    pub const VGA: Self = Self::new(640, 480);

    /// Number of pixels at this resolution
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Which frame source a capture should use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    /// First available real camera
    Auto,
    /// Real camera by platform device index
    Index(u32),
    /// Synthetic frames, no hardware
    Mock,
}

/// Capture configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Frame source selection
    pub source: CaptureSource,
    /// Requested resolution
    pub resolution: Resolution,
    /// Requested framerate
    pub framerate: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source: CaptureSource::Auto,
            resolution: Resolution::FEED,
            framerate: 30,
        }
    }
}

impl CaptureConfig {
    /// Validate configuration
    pub fn validate(&self) -> MediaResult<()> {
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(MediaError::InvalidConfiguration {
                message: "Invalid resolution".to_string(),
            });
        }

        if self.framerate == 0 || self.framerate > 120 {
            return Err(MediaError::InvalidConfiguration {
                message: "Invalid framerate".to_string(),
            });
        }

        Ok(())
    }
}

/// Camera device information
#[derive(Debug, Clone)]
pub struct CaptureDevice {
    /// Platform device index
    pub index: u32,
    /// Human-readable device name
    pub name: String,
    /// Device description
    pub description: String,
}

/// Capture statistics
#[derive(Debug, Clone, Default)]
pub struct CaptureStats {
    /// Frames successfully grabbed
    pub frames_captured: u64,
    /// Grabs that returned no frame (camera not ready yet)
    pub empty_grabs: u64,
    /// Total raw bytes captured
    pub total_bytes: u64,
}

/// A frame source the capture handle can drive
pub trait CaptureBackend: Send {
    /// Open the underlying device for the given configuration
    fn open(&mut self, config: &CaptureConfig) -> MediaResult<()>;
    /// Start streaming frames
    fn start(&mut self) -> MediaResult<()>;
    /// Stop streaming and release the device
    fn stop(&mut self) -> MediaResult<()>;
    /// Grab the most recent frame, or `None` if the source has not
    /// produced one yet
    fn try_frame(&mut self) -> MediaResult<Option<VideoFrame>>;
    /// Whether the backend is currently streaming
    fn is_capturing(&self) -> bool;
}

/// Owning handle for a capture backend
///
/// Selects a backend from the configured [`CaptureSource`], tracks
/// statistics, and releases the device exactly once: `stop` is idempotent
/// and `Drop` stops a still-running capture.
pub struct CameraCapture {
    backend: Box<dyn CaptureBackend>,
    config: CaptureConfig,
    stats: CaptureStats,
    stopped: bool,
}

impl CameraCapture {
    /// Open a capture for the given configuration
    pub fn open(config: CaptureConfig) -> MediaResult<Self> {
        config.validate()?;

        let mut backend: Box<dyn CaptureBackend> = match config.source {
            CaptureSource::Mock => Box::new(MockCapture::new()),
            CaptureSource::Auto | CaptureSource::Index(_) => Box::new(WebcamCapture::new()),
        };
        backend.open(&config)?;

        Ok(Self {
            backend,
            config,
            stats: CaptureStats::default(),
            stopped: false,
        })
    }

    /// Open a capture over an already-constructed backend
    ///
    /// Used by tests to inject a preconfigured mock.
    pub fn with_backend(
        mut backend: Box<dyn CaptureBackend>,
        config: CaptureConfig,
    ) -> MediaResult<Self> {
        config.validate()?;
        backend.open(&config)?;

        Ok(Self {
            backend,
            config,
            stats: CaptureStats::default(),
            stopped: false,
        })
    }

    /// Start streaming frames from the device
    pub fn start(&mut self) -> MediaResult<()> {
        self.backend.start()?;
        debug!(config = ?self.config, "Capture started");
        Ok(())
    }

    /// Stop streaming and release the device
    ///
    /// Idempotent: the device is released on the first call only.
    pub fn stop(&mut self) -> MediaResult<()> {
        if self.stopped {
            return Ok(());
        }
        self.stopped = true;
        self.backend.stop()?;
        debug!("Capture stopped");
        Ok(())
    }

    /// Grab the most recent frame
    ///
    /// Returns `Ok(None)` while the source has not produced a frame yet;
    /// that is a skip, not an error.
    pub fn try_frame(&mut self) -> MediaResult<Option<VideoFrame>> {
        if self.stopped {
            return Err(MediaError::CaptureNotActive);
        }

        match self.backend.try_frame()? {
            Some(frame) => {
                self.stats.frames_captured += 1;
                self.stats.total_bytes += frame.byte_len() as u64;
                Ok(Some(frame))
            }
            None => {
                self.stats.empty_grabs += 1;
                Ok(None)
            }
        }
    }

    /// Whether the capture is currently streaming
    pub fn is_capturing(&self) -> bool {
        !self.stopped && self.backend.is_capturing()
    }

    /// Current capture statistics
    pub fn stats(&self) -> &CaptureStats {
        &self.stats
    }

    /// Current configuration
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        if !self.stopped {
            if let Err(e) = self.stop() {
                warn!("Failed to release camera on drop: {}", e);
            }
        }
    }
}
