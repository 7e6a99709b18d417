//! Event system for feed sessions
//!
//! A session publishes everything a UI would render (analyzed frames, the
//! threat banner, the end-of-feed summary) on a broadcast channel, so the
//! library stays agnostic about what the display surface actually is.

use tokio::sync::broadcast;

/// Events emitted by a feed session
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// The backend returned an analysis for an uploaded frame
    FrameAnalyzed {
        /// Annotated frame as a data URI
        image: String,
        /// Whether loitering was detected in this frame
        loitering: bool,
    },
    /// The threat banner visibility changed
    ThreatBannerChanged {
        /// Whether the banner is now visible
        visible: bool,
    },
    /// A frame upload failed; the loop continues
    UploadFailed {
        /// Error description
        error: String,
    },
    /// The session is ending: capture stopped, summary requested
    FeedEnding,
    /// The end-of-feed summary arrived
    SummaryReady {
        /// Final motion heatmap as a data URI
        heatmap_image: String,
    },
    /// The end-of-feed request failed; the view keeps the last live frame
    SummaryFailed {
        /// Error description
        error: String,
    },
}

impl FeedEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            FeedEvent::FrameAnalyzed { .. } => "frame_analyzed",
            FeedEvent::ThreatBannerChanged { .. } => "threat_banner_changed",
            FeedEvent::UploadFailed { .. } => "upload_failed",
            FeedEvent::FeedEnding => "feed_ending",
            FeedEvent::SummaryReady { .. } => "summary_ready",
            FeedEvent::SummaryFailed { .. } => "summary_failed",
        }
    }

    /// Check if this is an error event
    pub fn is_error_event(&self) -> bool {
        matches!(
            self,
            FeedEvent::UploadFailed { .. } | FeedEvent::SummaryFailed { .. }
        )
    }

    /// Check if this event belongs to the end-of-session path
    pub fn is_end_event(&self) -> bool {
        matches!(
            self,
            FeedEvent::FeedEnding | FeedEvent::SummaryReady { .. } | FeedEvent::SummaryFailed { .. }
        )
    }
}

/// Stream of feed events for async iteration
#[derive(Debug)]
pub struct EventStream {
    receiver: broadcast::Receiver<FeedEvent>,
}

impl EventStream {
    /// Create a new event stream over a broadcast receiver
    pub fn new(receiver: broadcast::Receiver<FeedEvent>) -> Self {
        Self { receiver }
    }

    /// Get the next event from the stream
    ///
    /// Returns `None` once the session is gone. A slow consumer that lags
    /// behind the channel capacity skips the overwritten events and
    /// continues from the oldest retained one.
    pub async fn next(&mut self) -> Option<FeedEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event stream lagged, skipped {} events", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to get the next event without blocking
    pub fn try_next(&mut self) -> Option<FeedEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        let event = FeedEvent::FrameAnalyzed {
            image: "data:image/png;base64,AAA".to_string(),
            loitering: false,
        };
        assert_eq!(event.event_type(), "frame_analyzed");
        assert!(!event.is_error_event());
        assert!(!event.is_end_event());

        let event = FeedEvent::SummaryFailed {
            error: "boom".to_string(),
        };
        assert!(event.is_error_event());
        assert!(event.is_end_event());
    }

    #[tokio::test]
    async fn test_event_stream_delivery() {
        let (tx, rx) = broadcast::channel(16);
        let mut stream = EventStream::new(rx);

        tx.send(FeedEvent::FeedEnding).unwrap();
        let event = stream.next().await.unwrap();
        assert_eq!(event.event_type(), "feed_ending");

        drop(tx);
        assert!(stream.next().await.is_none());
    }
}
