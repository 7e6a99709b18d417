//! Wire types for the analysis backend
//!
//! Two endpoints make up the whole contract: `POST /upload` takes one
//! JPEG frame and returns the annotated frame plus a threat status, and
//! `POST /end_feed` closes the session and returns the motion heatmap.

use serde::{Deserialize, Serialize};

/// Request body for `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameUpload {
    /// Captured frame as a `data:image/jpeg;base64,...` URI
    pub image: String,
}

/// Threat assessment attached to an analysis result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatStatus {
    /// Whether any tracked person is currently loitering
    pub loitering_detected: bool,
    /// Track IDs currently flagged as loitering
    #[serde(default)]
    pub active_threat_ids: Vec<String>,
}

/// Response body for `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Annotated frame as a data URI
    pub image: String,
    /// Threat assessment; servers may omit it entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threat: Option<ThreatStatus>,
}

impl AnalysisResult {
    /// Whether this result should raise the threat banner
    ///
    /// An absent `threat` field counts as no threat.
    pub fn loitering_detected(&self) -> bool {
        self.threat
            .as_ref()
            .map(|t| t.loitering_detected)
            .unwrap_or(false)
    }
}

/// Response body for `POST /end_feed`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSummary {
    /// Final motion heatmap as a data URI
    pub heatmap_image: String,
}
