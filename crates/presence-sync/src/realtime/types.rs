//! Configuration, link state, and event types for the stream client.

use std::time::Duration;

use crate::error::SyncError;
use crate::snapshot::PresenceSnapshot;

pub const DEFAULT_STREAM_URL: &str = "wss://api.lanyard.rest/socket";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// WebSocket endpoint.
    pub url: String,
    /// Fixed delay before reconnecting after an unclean close.
    pub reconnect_delay: Duration,
    /// Upper bound on a single connection attempt.
    pub connect_timeout: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STREAM_URL.to_string(),
            reconnect_delay: Duration::from_secs(3),
            connect_timeout: Duration::from_secs(15),
        }
    }
}

// ---------------------------------------------------------------------------
// Link state
// ---------------------------------------------------------------------------

/// Connection lifecycle. Only the reconnect timer moves the link out of
/// `ReconnectScheduled`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    ReconnectScheduled,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events emitted by the stream client.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    Link(LinkState),
    /// Initial state for the subscribed subject.
    Init(PresenceSnapshot),
    /// Incremental update for the subscribed subject.
    Update(PresenceSnapshot),
    Error(SyncError),
}
