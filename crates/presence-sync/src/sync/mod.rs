//! Presence synchronizer: the stream, the poll, and the state they feed.

mod poll;
mod state;
mod subscription;
mod translator;
mod types;


pub use subscription::{PresenceSynchronizer, Subscription};
pub use types::{SyncConfig, SyncState, DEFAULT_API_BASE_URL};
