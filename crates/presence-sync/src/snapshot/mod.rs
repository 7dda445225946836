//! Presence snapshot model and its mapping from Lanyard payloads.

mod display;
mod types;
mod wire;


pub use display::{format_elapsed, now_millis};
pub use types::{
    Activity, ActivityAssets, ActivityKind, DiscordUser, MusicSession, PresenceSnapshot, Status,
};
pub(crate) use wire::RawPresence;
pub use wire::snapshot_from_value;
