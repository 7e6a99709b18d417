//! HTTP client for the analysis backend

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::protocol::{AnalysisResult, FeedSummary, FrameUpload};

/// Client for the two analysis endpoints
///
/// Holds a single connection-pooling `reqwest::Client`; cloning is cheap
/// and clones share the pool. No retries and no per-request timeout are
/// applied here: the capture loop's own cadence is the retry for transient
/// upload failures.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Create a client for the backend at `base_url`,
    /// e.g. `http://127.0.0.1:5000`
    pub fn new(base_url: &str) -> ClientResult<Self> {
        // Parse once so malformed URLs fail at construction, not per tick.
        Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
            reason: format!("{}: {}", base_url, e),
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_http_client(http: reqwest::Client, base_url: &str) -> ClientResult<Self> {
        let mut client = Self::new(base_url)?;
        client.http = http;
        Ok(client)
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload one frame for analysis
    ///
    /// `image` must be a `data:image/jpeg;base64,...` URI. Returns the
    /// annotated frame and the current threat status.
    pub async fn upload_frame(&self, image: &str) -> ClientResult<AnalysisResult> {
        let body = FrameUpload {
            image: image.to_string(),
        };

        debug!(bytes = image.len(), "Uploading frame");
        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .json(&body)
            .send()
            .await?;

        Self::parse_json(response, "/upload").await
    }

    /// End the feed and fetch the final motion heatmap
    ///
    /// Issued exactly once per session, with an empty body.
    pub async fn end_feed(&self) -> ClientResult<FeedSummary> {
        debug!("Requesting end-of-feed summary");
        let response = self
            .http
            .post(format!("{}/end_feed", self.base_url))
            .send()
            .await?;

        Self::parse_json(response, "/end_feed").await
    }

    async fn parse_json<T: DeserializeOwned>(
        response: Response,
        endpoint: &str,
    ) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidBody {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })
    }
}
