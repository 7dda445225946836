//! One-shot snapshot fetches.
//!
//! [`SnapshotSource`] is the seam between the synchronizer and whatever
//! answers "what is this subject's presence right now". [`LanyardRest`]
//! answers it with `GET {api_base_url}/v1/users/{id}`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::snapshot::{snapshot_from_value, PresenceSnapshot};
use crate::sync::SyncConfig;

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, subject_id: &str) -> Result<PresenceSnapshot, FetchError>;
}

// ---------------------------------------------------------------------------
// Lanyard REST
// ---------------------------------------------------------------------------

/// REST client for the Lanyard presence API.
pub struct LanyardRest {
    http: reqwest::Client,
    base_url: String,
}

impl LanyardRest {
    pub fn new(config: &SyncConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("presence-sync/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.fetch_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn user_url(&self, subject_id: &str) -> String {
        format!("{}/v1/users/{subject_id}", self.base_url)
    }
}

#[async_trait]
impl SnapshotSource for LanyardRest {
    async fn fetch(&self, subject_id: &str) -> Result<PresenceSnapshot, FetchError> {
        let url = self.user_url(subject_id);
        debug!(url = %url, "Fetching presence snapshot");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        parse_response(status, &body, subject_id)
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Interpret a `{success, data}` response body.
///
/// Non-2xx statuses, `success: false`, and bodies that do not parse are
/// all failures.
pub fn parse_response(
    status: u16,
    body: &str,
    subject_id: &str,
) -> Result<PresenceSnapshot, FetchError> {
    if !(200..300).contains(&status) {
        return Err(FetchError::Status(status));
    }

    let response: ApiResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    if !response.success {
        return Err(FetchError::Unsuccessful);
    }

    let data = response
        .data
        .ok_or_else(|| FetchError::Malformed("response has no data".into()))?;
    snapshot_from_value(data, subject_id).map_err(|e| FetchError::Malformed(e.to_string()))
}
