//! # watchfeed media
//!
//! Camera capture and frame encoding for the watchfeed client.
//! This crate owns everything between the physical camera and the wire:
//! grabbing frames, converting them to RGB8, and compressing them into the
//! JPEG data URIs the analysis backend consumes.

#![warn(clippy::all)]

pub mod capture;
pub mod encode;
pub mod error;
pub mod frame;

// Re-export main types
pub use capture::{
    enumerate_devices, CameraCapture, CaptureBackend, CaptureConfig, CaptureDevice, CaptureSource,
    CaptureStats, MockCapture, Resolution, WebcamCapture,
};
pub use encode::{decode_data_uri, encode_jpeg, jpeg_data_uri, DEFAULT_JPEG_QUALITY};
pub use error::{MediaError, MediaResult};
pub use frame::VideoFrame;
