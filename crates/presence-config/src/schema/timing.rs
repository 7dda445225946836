//! Poll, reconnect, and timeout settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Fallback poll period in seconds (valid range: 5-3600).
    pub poll_interval_secs: u32,
    /// Delay before reconnecting after an unclean close (valid range: 100-60000).
    pub reconnect_delay_ms: u32,
    /// Connection attempt timeout in seconds (valid range: 1-120).
    pub connect_timeout_secs: u32,
    /// REST request timeout in seconds; 0 disables it (otherwise 1-300).
    pub fetch_timeout_secs: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
            reconnect_delay_ms: 3000,
            connect_timeout_secs: 15,
            fetch_timeout_secs: 0,
        }
    }
}
