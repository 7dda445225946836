//! Synchronizer configuration and the observable state.

use std::sync::Arc;
use std::time::Duration;

use crate::error::SyncError;
use crate::realtime::{LinkState, StreamConfig, DEFAULT_STREAM_URL};
use crate::snapshot::PresenceSnapshot;

pub const DEFAULT_API_BASE_URL: &str = "https://api.lanyard.rest";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Base URL of the REST API; `/v1/users/{id}` is appended.
    pub api_base_url: String,
    /// WebSocket endpoint for live updates.
    pub stream_url: String,
    /// Period of the fallback poll.
    pub poll_interval: Duration,
    /// Fixed delay before reconnecting after an unclean close.
    pub reconnect_delay: Duration,
    pub connect_timeout: Duration,
    /// `None` lets a fetch run until the server answers.
    pub fetch_timeout: Option<Duration>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            stream_url: DEFAULT_STREAM_URL.to_string(),
            poll_interval: Duration::from_secs(30),
            reconnect_delay: Duration::from_secs(3),
            connect_timeout: Duration::from_secs(15),
            fetch_timeout: None,
        }
    }
}

impl SyncConfig {
    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig {
            url: self.stream_url.clone(),
            reconnect_delay: self.reconnect_delay,
            connect_timeout: self.connect_timeout,
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Everything a consumer can observe about one subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncState {
    /// Freshest known presence, `None` until the first success.
    pub snapshot: Option<Arc<PresenceSnapshot>>,
    /// `true` until the activation fetch settles, and during `refresh_now`.
    pub is_loading: bool,
    /// Most recent failure from any source.
    pub last_error: Option<SyncError>,
    pub link: LinkState,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            snapshot: None,
            is_loading: true,
            last_error: None,
            link: LinkState::Disconnected,
        }
    }
}
