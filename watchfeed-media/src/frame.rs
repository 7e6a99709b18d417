//! Video frame representation

use crate::error::{MediaError, MediaResult};

/// A single captured video frame in packed RGB8
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Packed RGB8 pixel data (3 bytes per pixel, row-major)
    pub data: Vec<u8>,
    /// Capture timestamp in milliseconds since the capture started
    pub timestamp_ms: u64,
}

impl VideoFrame {
    /// Create a new frame, validating that the buffer matches the dimensions
    pub fn new(width: u32, height: u32, data: Vec<u8>, timestamp_ms: u64) -> MediaResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(MediaError::InvalidFrameData {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
            timestamp_ms,
        })
    }

    /// Number of pixels in the frame
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Size of the raw pixel buffer in bytes
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}
