//! JPEG and data-URI encoding for captured frames
//!
//! The analysis backend consumes frames as `data:image/jpeg;base64,...`
//! strings, so encoding happens in two steps: lossy JPEG compression via
//! the `image` crate, then base64 wrapping into a data URI.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::error::{MediaError, MediaResult};
use crate::frame::VideoFrame;

/// Default JPEG quality used by the upload loop (matches canvas quality 0.6)
pub const DEFAULT_JPEG_QUALITY: u8 = 60;

/// Encode a frame as a JPEG data URI at the given quality (0-100)
pub fn jpeg_data_uri(frame: &VideoFrame, quality: u8) -> MediaResult<String> {
    let jpeg = encode_jpeg(frame, quality)?;
    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg)))
}

/// Compress a frame to raw JPEG bytes
pub fn encode_jpeg(frame: &VideoFrame, quality: u8) -> MediaResult<Vec<u8>> {
    if quality == 0 || quality > 100 {
        return Err(MediaError::InvalidConfiguration {
            message: format!("JPEG quality must be 1-100, got {}", quality),
        });
    }

    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
    encoder
        .encode(
            &frame.data,
            frame.width,
            frame.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| MediaError::EncodingFailed {
            reason: e.to_string(),
        })?;

    Ok(jpeg)
}

/// Decode the payload of a `data:<mime>;base64,<payload>` URI
///
/// Used to recover image bytes from server replies, e.g. when saving the
/// final heatmap to disk.
pub fn decode_data_uri(uri: &str) -> MediaResult<Vec<u8>> {
    if !uri.starts_with("data:") {
        return Err(MediaError::InvalidDataUri {
            reason: "missing data: scheme".to_string(),
        });
    }

    let (_, payload) = uri.split_once(',').ok_or_else(|| MediaError::InvalidDataUri {
        reason: "missing comma separator".to_string(),
    })?;

    STANDARD
        .decode(payload)
        .map_err(|e| MediaError::InvalidDataUri {
            reason: format!("base64 decode failed: {}", e),
        })
}
