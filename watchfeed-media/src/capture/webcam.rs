//! Real camera capture via nokhwa
//!
//! Drives a physical device through nokhwa's native input backends
//! (AVFoundation on macOS, V4L2 on Linux, MediaFoundation on Windows)
//! and decodes every grabbed buffer to packed RGB8.

use std::time::Instant;

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    Resolution as NokhwaResolution,
};
use nokhwa::{query, Camera};
use tracing::{debug, info};

use super::{CaptureBackend, CaptureConfig, CaptureDevice, CaptureSource};
use crate::error::{MediaError, MediaResult};
use crate::frame::VideoFrame;

/// Enumerate available camera devices
pub fn enumerate_devices() -> MediaResult<Vec<CaptureDevice>> {
    let cameras = query(ApiBackend::Auto).map_err(|e| MediaError::DeviceEnumerationFailed {
        reason: e.to_string(),
    })?;

    Ok(cameras
        .into_iter()
        .enumerate()
        .map(|(i, info)| CaptureDevice {
            index: info.index().as_index().unwrap_or(i as u32),
            name: info.human_name(),
            description: info.description().to_string(),
        })
        .collect())
}

/// Capture backend backed by a real camera device
pub struct WebcamCapture {
    camera: Option<Camera>,
    capturing: bool,
    started_at: Option<Instant>,
    first_frame_seen: bool,
}

impl WebcamCapture {
    /// Create an unopened webcam backend
    pub fn new() -> Self {
        Self {
            camera: None,
            capturing: false,
            started_at: None,
            first_frame_seen: false,
        }
    }
}

impl Default for WebcamCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for WebcamCapture {
    fn open(&mut self, config: &CaptureConfig) -> MediaResult<()> {
        let index = match config.source {
            CaptureSource::Index(i) => CameraIndex::Index(i),
            CaptureSource::Auto => CameraIndex::Index(0),
            CaptureSource::Mock => {
                return Err(MediaError::InvalidConfiguration {
                    message: "Mock source handed to webcam backend".to_string(),
                })
            }
        };

        let format = CameraFormat::new(
            NokhwaResolution::new(config.resolution.width, config.resolution.height),
            FrameFormat::MJPEG,
            config.framerate,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

        let camera = Camera::new(index.clone(), requested).map_err(|e| {
            MediaError::CameraAcquisition {
                reason: format!("device {:?}: {}", index, e),
            }
        })?;

        info!(
            "Opened camera {:?} at {}x{}",
            index,
            camera.resolution().width(),
            camera.resolution().height()
        );
        self.camera = Some(camera);
        Ok(())
    }

    fn start(&mut self) -> MediaResult<()> {
        let camera = self.camera.as_mut().ok_or(MediaError::CaptureNotActive)?;
        camera
            .open_stream()
            .map_err(|e| MediaError::CameraAcquisition {
                reason: format!("open stream: {}", e),
            })?;
        self.capturing = true;
        self.started_at = Some(Instant::now());
        Ok(())
    }

    fn stop(&mut self) -> MediaResult<()> {
        if let Some(camera) = self.camera.as_mut() {
            if self.capturing {
                camera
                    .stop_stream()
                    .map_err(|e| MediaError::CaptureFailed {
                        reason: format!("stop stream: {}", e),
                    })?;
            }
        }
        self.capturing = false;
        // Dropping the handle releases the device.
        self.camera = None;
        Ok(())
    }

    fn try_frame(&mut self) -> MediaResult<Option<VideoFrame>> {
        if !self.capturing {
            return Err(MediaError::CaptureNotActive);
        }
        let camera = self.camera.as_mut().ok_or(MediaError::CaptureNotActive)?;

        let buffer = match camera.frame() {
            Ok(buffer) => buffer,
            // Devices commonly fail the first few grabs while the stream
            // spins up; treat those as "no frame yet" rather than errors.
            Err(e) if !self.first_frame_seen => {
                debug!("Camera not ready yet: {}", e);
                return Ok(None);
            }
            Err(e) => {
                return Err(MediaError::CaptureFailed {
                    reason: e.to_string(),
                })
            }
        };

        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| MediaError::CaptureFailed {
                reason: format!("decode: {}", e),
            })?;

        self.first_frame_seen = true;
        let timestamp_ms = self
            .started_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);

        let (width, height) = (decoded.width(), decoded.height());
        VideoFrame::new(width, height, decoded.into_raw(), timestamp_ms).map(Some)
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }
}
