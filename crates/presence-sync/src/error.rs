//! Error taxonomy surfaced through `SyncState::last_error`.
//!
//! None of these are fatal. They are `Clone` so the latest one can live in
//! the observable state alongside the snapshot.

/// Failure of a one-shot snapshot fetch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("api returned status {0}")]
    Status(u16),

    #[error("api returned an unsuccessful response")]
    Unsuccessful,

    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("failed to load presence: {0}")]
    Fetch(#[from] FetchError),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("stream closed unexpectedly: {0}")]
    UnexpectedClose(String),
}
