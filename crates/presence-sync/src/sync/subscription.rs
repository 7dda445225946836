//! Entry point and per-subject subscription handle.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{FetchError, SyncError};
use crate::fetch::{LanyardRest, SnapshotSource};
use crate::realtime::StreamClient;
use crate::snapshot::PresenceSnapshot;

use super::poll::poll_loop;
use super::state::StateCell;
use super::translator::stream_translator;
use super::types::{SyncConfig, SyncState};

// ---------------------------------------------------------------------------
// Synchronizer
// ---------------------------------------------------------------------------

/// Factory for subscriptions sharing one configuration and snapshot source.
#[derive(Clone)]
pub struct PresenceSynchronizer {
    config: SyncConfig,
    source: Arc<dyn SnapshotSource>,
}

impl PresenceSynchronizer {
    /// Build a synchronizer backed by the Lanyard REST API.
    pub fn new(config: SyncConfig) -> Result<Self, FetchError> {
        let source = LanyardRest::new(&config)?;
        Ok(Self::with_source(config, Arc::new(source)))
    }

    pub fn with_source(config: SyncConfig, source: Arc<dyn SnapshotSource>) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Activate a subscription for `subject_id`.
    ///
    /// Starts the activation fetch, the poll, and the stream connection.
    /// Must be called from within a Tokio runtime.
    pub fn subscribe(&self, subject_id: impl Into<String>) -> Subscription {
        Subscription::activate(self.config.clone(), Arc::clone(&self.source), subject_id.into())
    }

    /// One fetch, no subscription.
    pub async fn fetch_once(&self, subject_id: &str) -> Result<PresenceSnapshot, FetchError> {
        self.source.fetch(subject_id).await
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// A live subscription to one subject's presence.
///
/// Dropping the handle tears everything down without waiting for the close
/// handshake; [`Subscription::deactivate`] waits for it.
pub struct Subscription {
    subject_id: String,
    config: SyncConfig,
    source: Arc<dyn SnapshotSource>,
    state: Arc<StateCell>,
    cancel: CancellationToken,
    stream: Option<StreamClient>,
    tasks: Vec<JoinHandle<()>>,
}

impl Subscription {
    fn activate(config: SyncConfig, source: Arc<dyn SnapshotSource>, subject_id: String) -> Self {
        info!(subject = %subject_id, "Activating presence subscription");

        let state = Arc::new(StateCell::new());
        let cancel = CancellationToken::new();

        let (stream, events) = StreamClient::connect(config.stream_config(), subject_id.clone());
        let translator = tokio::spawn(stream_translator(events, Arc::clone(&state)));
        let poll = tokio::spawn(poll_loop(
            Arc::clone(&source),
            subject_id.clone(),
            Arc::clone(&state),
            config.poll_interval,
            cancel.child_token(),
        ));

        Self {
            subject_id,
            config,
            source,
            state,
            cancel,
            stream: Some(stream),
            tasks: vec![translator, poll],
        }
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Current state.
    pub fn state(&self) -> SyncState {
        self.state.current()
    }

    /// Receiver notified on every observable change.
    pub fn watch(&self) -> watch::Receiver<SyncState> {
        self.state.receiver()
    }

    /// Fetch right now, outside the poll cadence.
    ///
    /// Sets `is_loading` for the duration. Does nothing once deactivated.
    pub async fn refresh_now(&self) {
        if self.state.is_sealed() {
            return;
        }
        self.state.begin_refresh();

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return,
            result = self.source.fetch(&self.subject_id) => result,
        };
        if let Err(e) = &result {
            debug!(subject = %self.subject_id, error = %e, "Manual refresh failed");
        }
        self.state.fetch_settled(result, true);
    }

    /// Close the stream, stop every timer, and wait for the background
    /// tasks to exit. The state is frozen from the moment this is called.
    pub async fn deactivate(mut self) {
        self.seal();
        if let Some(stream) = self.stream.take() {
            stream.shutdown().await;
        }
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
        info!(subject = %self.subject_id, "Presence subscription deactivated");
    }

    /// Deactivate, then activate a fresh subscription for `subject_id`.
    pub async fn switch_subject(self, subject_id: impl Into<String>) -> Subscription {
        let config = self.config.clone();
        let source = Arc::clone(&self.source);
        self.deactivate().await;
        Subscription::activate(config, source, subject_id.into())
    }

    /// Latest error, if any. Shorthand for `state().last_error`.
    pub fn last_error(&self) -> Option<SyncError> {
        self.state.current().last_error
    }

    fn seal(&self) {
        self.cancel.cancel();
        if let Some(stream) = &self.stream {
            stream.disconnect();
        }
        self.state.seal();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.seal();
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}
