//! Live presence synchronization for a single Discord account.
//!
//! Keeps the freshest known [`PresenceSnapshot`] for a subject by combining
//! a Lanyard WebSocket subscription (with heartbeats and reconnects) and a
//! periodic REST poll. Consumers observe a [`SyncState`] through a
//! [`Subscription`]; every failure ends up in `SyncState::last_error`.

pub mod error;
pub mod fetch;
pub mod protocol;
pub mod realtime;
pub mod snapshot;
pub mod sync;

#[cfg(test)]
mod test_support;

pub use error::{FetchError, SyncError};
pub use fetch::{LanyardRest, SnapshotSource};
pub use realtime::{LinkState, StreamClient, StreamConfig, StreamEvent};
pub use snapshot::{
    format_elapsed, Activity, ActivityAssets, ActivityKind, DiscordUser, MusicSession,
    PresenceSnapshot, Status,
};
pub use sync::{PresenceSynchronizer, Subscription, SyncConfig, SyncState};
