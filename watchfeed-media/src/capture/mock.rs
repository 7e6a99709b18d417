//! Synthetic frame source for tests and headless runs

use std::time::Instant;

use rand::Rng;

use super::{CaptureBackend, CaptureConfig};
use crate::error::{MediaError, MediaResult};
use crate::frame::VideoFrame;

/// Capture backend that synthesises gradient frames with per-frame noise
///
/// An optional warm-up period models a real camera that has been opened
/// but has not delivered its first frame yet: the first `warmup_grabs`
/// calls to `try_frame` yield `None`.
pub struct MockCapture {
    config: Option<CaptureConfig>,
    capturing: bool,
    warmup_remaining: u32,
    sequence: u64,
    started_at: Option<Instant>,
}

impl MockCapture {
    /// Create a mock source that produces a frame on every grab
    pub fn new() -> Self {
        Self::with_warmup(0)
    }

    /// Create a mock source whose first `warmup_grabs` grabs yield no frame
    pub fn with_warmup(warmup_grabs: u32) -> Self {
        Self {
            config: None,
            capturing: false,
            warmup_remaining: warmup_grabs,
            sequence: 0,
            started_at: None,
        }
    }

    /// Frames produced so far
    pub fn frames_produced(&self) -> u64 {
        self.sequence
    }

    fn synthesize(&mut self, config: &CaptureConfig) -> VideoFrame {
        let width = config.resolution.width;
        let height = config.resolution.height;
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        let mut rng = rand::thread_rng();

        // Diagonal gradient shifted per frame, plus noise so consecutive
        // frames never compress identically.
        let shift = (self.sequence % 256) as u32;
        for y in 0..height {
            for x in 0..width {
                let base = ((x + y + shift) % 256) as u8;
                let noise: u8 = rng.gen_range(0..16);
                data.push(base.saturating_add(noise));
                data.push(base);
                data.push(255 - base);
            }
        }

        self.sequence += 1;
        let timestamp_ms = self
            .started_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);

        VideoFrame {
            width,
            height,
            data,
            timestamp_ms,
        }
    }
}

impl Default for MockCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for MockCapture {
    fn open(&mut self, config: &CaptureConfig) -> MediaResult<()> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn start(&mut self) -> MediaResult<()> {
        if self.config.is_none() {
            return Err(MediaError::InvalidConfiguration {
                message: "Mock capture started before open".to_string(),
            });
        }
        self.capturing = true;
        self.started_at = Some(Instant::now());
        Ok(())
    }

    fn stop(&mut self) -> MediaResult<()> {
        self.capturing = false;
        Ok(())
    }

    fn try_frame(&mut self) -> MediaResult<Option<VideoFrame>> {
        if !self.capturing {
            return Err(MediaError::CaptureNotActive);
        }

        if self.warmup_remaining > 0 {
            self.warmup_remaining -= 1;
            return Ok(None);
        }

        let config = self.config.clone().ok_or(MediaError::CaptureNotActive)?;
        Ok(Some(self.synthesize(&config)))
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }
}
