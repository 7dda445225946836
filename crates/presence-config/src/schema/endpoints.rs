//! Remote endpoints.

use presence_sync::realtime::DEFAULT_STREAM_URL;
use presence_sync::sync::DEFAULT_API_BASE_URL;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// REST base URL (`http://` or `https://`).
    pub api_base_url: String,
    /// WebSocket URL (`ws://` or `wss://`).
    pub stream_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            stream_url: DEFAULT_STREAM_URL.to_string(),
        }
    }
}
