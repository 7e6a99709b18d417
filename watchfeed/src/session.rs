//! Feed session management: the capture-and-upload loop
//!
//! A [`FeedSession`] owns the camera, a tick task that uploads the latest
//! frame every interval, and the shared view a UI renders. Sessions move
//! one way through two phases, `Capturing` then `Ended`; ending releases
//! the camera and fetches the final motion heatmap.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use watchfeed_client::{AnalysisClient, AnalysisResult, FeedSummary};
use watchfeed_media::{jpeg_data_uri, CameraCapture, CaptureBackend, CaptureSource, Resolution};

use crate::config::FeedConfig;
use crate::error::WatchFeedError;
use crate::event::{EventStream, FeedEvent};

/// Phase of a feed session
///
/// One-way: `Capturing` to `Ended`, triggered only by [`FeedSession::end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedPhase {
    /// Frames are being captured and uploaded
    Capturing,
    /// The session has ended; no further frames are sent
    Ended,
}

impl fmt::Display for FeedPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedPhase::Capturing => write!(f, "capturing"),
            FeedPhase::Ended => write!(f, "ended"),
        }
    }
}

/// What the processed-output panel is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewLabel {
    /// Live annotated frames from the backend
    LiveFeed,
    /// The one-shot end-of-feed artifact
    FinalHeatmap,
}

impl fmt::Display for ViewLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewLabel::LiveFeed => write!(f, "Live Processed Feed"),
            ViewLabel::FinalHeatmap => write!(f, "Final Motion Heatmap"),
        }
    }
}

/// The displayed state of a session
///
/// UI-agnostic equivalent of the processed-image element and threat
/// banner: whatever arrives last wins, except that upload replies landing
/// after the session ended are discarded.
#[derive(Debug, Clone, Serialize)]
pub struct FeedView {
    /// Most recent processed image (data URI), if any has arrived
    pub processed_image: Option<String>,
    /// Whether the threat banner is visible
    pub threat_banner: bool,
    /// Label for the processed-output panel
    pub label: ViewLabel,
}

impl Default for FeedView {
    fn default() -> Self {
        Self {
            processed_image: None,
            threat_banner: false,
            label: ViewLabel::LiveFeed,
        }
    }
}

/// Session counters
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedStats {
    /// Ticks that produced an upload
    pub ticks: u64,
    /// Ticks skipped because no frame was available
    pub ticks_skipped: u64,
    /// Uploads answered successfully
    pub uploads_ok: u64,
    /// Uploads that failed in transport or parsing
    pub uploads_failed: u64,
    /// Round-trip time of the most recent successful upload
    pub last_rtt_ms: Option<u64>,
}

/// Phase and view, guarded together so the post-end reply guard and the
/// view write are a single atomic step
#[derive(Debug)]
struct FeedState {
    phase: FeedPhase,
    view: FeedView,
}

#[derive(Debug)]
struct FeedShared {
    state: RwLock<FeedState>,
    stats: RwLock<FeedStats>,
    events: broadcast::Sender<FeedEvent>,
}

/// Fluent builder for feed session configuration
pub struct FeedSessionBuilder {
    base_url: String,
    config: FeedConfig,
    backend: Option<Box<dyn CaptureBackend>>,
}

impl fmt::Debug for FeedSessionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedSessionBuilder")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .field("custom_backend", &self.backend.is_some())
            .finish()
    }
}

impl FeedSessionBuilder {
    pub(crate) fn new(base_url: &str, config: FeedConfig) -> Self {
        Self {
            base_url: base_url.to_string(),
            config,
            backend: None,
        }
    }

    /// Select a camera by platform device index
    pub fn camera(mut self, index: u32) -> Self {
        self.config.capture.source = CaptureSource::Index(index);
        self
    }

    /// Use the synthetic frame source instead of real hardware
    pub fn mock_camera(mut self) -> Self {
        self.config.capture.source = CaptureSource::Mock;
        self
    }

    /// Bring your own frame source
    pub fn capture_backend(mut self, backend: Box<dyn CaptureBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the requested capture resolution
    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.config.capture.resolution = Resolution::new(width, height);
        self
    }

    /// Set the interval between frame uploads
    pub fn upload_interval(mut self, interval: Duration) -> Self {
        self.config.upload_interval = interval;
        self
    }

    /// Set the JPEG quality for uploaded frames (1-100)
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    /// Acquire the camera and start the capture loop
    ///
    /// Camera acquisition failure is fatal to the session: it is logged
    /// and returned, and no retry is attempted.
    pub async fn start(self) -> Result<FeedSession, WatchFeedError> {
        self.config.validate()?;
        let client = AnalysisClient::new(&self.base_url)?;

        let mut capture = match self.backend {
            Some(backend) => CameraCapture::with_backend(backend, self.config.capture.clone()),
            None => CameraCapture::open(self.config.capture.clone()),
        }
        .map_err(|e| {
            error!("Camera error: {}", e);
            WatchFeedError::from(e)
        })?;

        capture.start().map_err(|e| {
            error!("Camera error: {}", e);
            WatchFeedError::from(e)
        })?;

        let id = Uuid::new_v4();
        let (events, _) = broadcast::channel(100);
        let shared = Arc::new(FeedShared {
            state: RwLock::new(FeedState {
                phase: FeedPhase::Capturing,
                view: FeedView::default(),
            }),
            stats: RwLock::new(FeedStats::default()),
            events,
        });
        let capture = Arc::new(Mutex::new(capture));

        let tick_task = tokio::spawn(tick_loop(
            shared.clone(),
            capture.clone(),
            client.clone(),
            self.config.upload_interval,
            self.config.jpeg_quality,
        ));

        info!(
            session = %id,
            interval_ms = self.config.upload_interval.as_millis() as u64,
            "Feed session started"
        );

        Ok(FeedSession {
            id,
            started_at: chrono::Utc::now(),
            config: self.config,
            shared,
            capture,
            client,
            tick_task: Some(tick_task),
        })
    }
}

/// A running capture-and-upload session
pub struct FeedSession {
    id: Uuid,
    started_at: chrono::DateTime<chrono::Utc>,
    config: FeedConfig,
    shared: Arc<FeedShared>,
    capture: Arc<Mutex<CameraCapture>>,
    client: AnalysisClient,
    tick_task: Option<JoinHandle<()>>,
}

impl FeedSession {
    /// Session ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the session started
    pub fn started_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.started_at
    }

    /// Session configuration
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Current phase
    pub fn phase(&self) -> FeedPhase {
        self.shared.state.read().phase
    }

    /// Whether the camera is still streaming
    pub fn is_capturing(&self) -> bool {
        self.capture.lock().is_capturing()
    }

    /// Snapshot of the displayed state
    pub fn view(&self) -> FeedView {
        self.shared.state.read().view.clone()
    }

    /// Snapshot of the session counters
    pub fn stats(&self) -> FeedStats {
        self.shared.stats.read().clone()
    }

    /// Subscribe to session events
    pub fn events(&self) -> EventStream {
        EventStream::new(self.shared.events.subscribe())
    }

    /// End the session and fetch the final motion heatmap
    ///
    /// The first call flips the phase, cancels the tick task, releases
    /// the camera and issues the single `/end_feed` request; on success
    /// the heatmap replaces the displayed image. A failed summary request
    /// leaves the view on the last live frame. Subsequent calls return an
    /// `InvalidState` error without side effects.
    pub async fn end(&mut self) -> Result<FeedSummary, WatchFeedError> {
        {
            let mut state = self.shared.state.write();
            if state.phase == FeedPhase::Ended {
                return Err(WatchFeedError::InvalidState {
                    expected: FeedPhase::Capturing.to_string(),
                    actual: state.phase.to_string(),
                });
            }
            state.phase = FeedPhase::Ended;
            state.view.threat_banner = false;
            state.view.label = ViewLabel::FinalHeatmap;
        }

        if let Some(task) = self.tick_task.take() {
            task.abort();
        }
        if let Err(e) = self.capture.lock().stop() {
            warn!("Failed to release camera: {}", e);
        }
        let _ = self.shared.events.send(FeedEvent::FeedEnding);
        info!(session = %self.id, "Feed ended, requesting summary");

        match self.client.end_feed().await {
            Ok(summary) => {
                self.shared.state.write().view.processed_image =
                    Some(summary.heatmap_image.clone());
                let _ = self.shared.events.send(FeedEvent::SummaryReady {
                    heatmap_image: summary.heatmap_image.clone(),
                });
                Ok(summary)
            }
            Err(e) => {
                error!("End feed error: {}", e);
                let _ = self.shared.events.send(FeedEvent::SummaryFailed {
                    error: e.to_string(),
                });
                Err(e.into())
            }
        }
    }
}

impl Drop for FeedSession {
    fn drop(&mut self) {
        if let Some(task) = self.tick_task.take() {
            task.abort();
        }
    }
}

impl fmt::Debug for FeedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedSession")
            .field("id", &self.id)
            .field("phase", &self.phase())
            .finish()
    }
}

/// The repeating capture tick
///
/// Each tick grabs the latest frame, encodes it, and spawns the upload so
/// a slow backend never stalls the cadence. Transient failures are logged
/// and dropped; the next tick is the retry.
async fn tick_loop(
    shared: Arc<FeedShared>,
    capture: Arc<Mutex<CameraCapture>>,
    client: AnalysisClient,
    interval: Duration,
    jpeg_quality: u8,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if shared.state.read().phase == FeedPhase::Ended {
            break;
        }

        // Device reads block, so grab off the async threads.
        let grab_capture = capture.clone();
        let grab = tokio::task::spawn_blocking(move || grab_capture.lock().try_frame()).await;

        let frame = match grab {
            Ok(Ok(Some(frame))) => frame,
            Ok(Ok(None)) => {
                shared.stats.write().ticks_skipped += 1;
                debug!("No frame available yet, skipping tick");
                continue;
            }
            Ok(Err(e)) => {
                warn!("Frame grab failed: {}", e);
                continue;
            }
            // Runtime is shutting down.
            Err(_) => break,
        };

        let image = match jpeg_data_uri(&frame, jpeg_quality) {
            Ok(uri) => uri,
            Err(e) => {
                warn!("Frame encode failed: {}", e);
                continue;
            }
        };
        shared.stats.write().ticks += 1;

        let upload_shared = shared.clone();
        let upload_client = client.clone();
        tokio::spawn(async move {
            let sent_at = std::time::Instant::now();
            match upload_client.upload_frame(&image).await {
                Ok(result) => apply_analysis(&upload_shared, result, sent_at.elapsed()),
                Err(e) => {
                    warn!("Upload error: {}", e);
                    upload_shared.stats.write().uploads_failed += 1;
                    let _ = upload_shared.events.send(FeedEvent::UploadFailed {
                        error: e.to_string(),
                    });
                }
            }
        });
    }
}

/// Apply one analysis reply to the shared view
///
/// This is the resume point of every pending upload: replies arriving
/// after the session ended are discarded so a stale frame never races
/// onto the post-session view.
fn apply_analysis(shared: &FeedShared, result: AnalysisResult, rtt: Duration) {
    let loitering = result.loitering_detected();

    let banner_changed = {
        let mut state = shared.state.write();
        if state.phase == FeedPhase::Ended {
            debug!("Discarding analysis reply received after end");
            return;
        }
        let changed = state.view.threat_banner != loitering;
        state.view.processed_image = Some(result.image.clone());
        state.view.threat_banner = loitering;
        changed
    };

    {
        let mut stats = shared.stats.write();
        stats.uploads_ok += 1;
        stats.last_rtt_ms = Some(rtt.as_millis() as u64);
    }
    let _ = shared.events.send(FeedEvent::FrameAnalyzed {
        image: result.image,
        loitering,
    });
    if banner_changed {
        let _ = shared.events.send(FeedEvent::ThreatBannerChanged { visible: loitering });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(FeedPhase::Capturing.to_string(), "capturing");
        assert_eq!(FeedPhase::Ended.to_string(), "ended");
    }

    #[test]
    fn test_view_defaults() {
        let view = FeedView::default();
        assert!(view.processed_image.is_none());
        assert!(!view.threat_banner);
        assert_eq!(view.label, ViewLabel::LiveFeed);
        assert_eq!(view.label.to_string(), "Live Processed Feed");
        assert_eq!(ViewLabel::FinalHeatmap.to_string(), "Final Motion Heatmap");
    }
}
