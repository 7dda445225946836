//! Public handle for a running stream subscription.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::connection::connection_loop;
use super::types::{StreamConfig, StreamEvent};

/// How long `shutdown` waits for the close handshake before giving up.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Handle for one background stream connection.
///
/// Dropping the handle cancels the connection; the background task sends a
/// close frame and exits on its own.
pub struct StreamClient {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl StreamClient {
    /// Start the background connection for `subject_id`.
    /// Returns `(client, event_receiver)`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect(
        config: StreamConfig,
        subject_id: impl Into<String>,
    ) -> (Self, mpsc::Receiver<StreamEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(connection_loop(
            config,
            subject_id.into(),
            event_tx,
            cancel.clone(),
        ));

        (
            Self {
                cancel,
                task: Some(task),
            },
            event_rx,
        )
    }

    /// Request disconnection without waiting for it.
    pub fn disconnect(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Disconnect and wait for the background task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(mut task) = self.task.take() {
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut task).await.is_err() {
                warn!("Presence stream did not close in time, aborting");
                task.abort();
            }
        }
    }
}

impl Drop for StreamClient {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
