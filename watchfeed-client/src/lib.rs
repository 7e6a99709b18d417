//! # watchfeed client
//!
//! Wire protocol types and the HTTP client for the watchfeed analysis
//! backend. The backend is an opaque collaborator reached through exactly
//! two endpoints: per-frame upload and one-shot end-of-feed summary.

#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod protocol;

// Re-export main types
pub use client::AnalysisClient;
pub use error::{ClientError, ClientResult};
pub use protocol::{AnalysisResult, FeedSummary, FrameUpload, ThreatStatus};
