//! Fixed-period fallback poll.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::fetch::SnapshotSource;

use super::state::StateCell;

/// Fetch immediately, then once per `period`, until cancelled.
///
/// The first fetch is the activation fetch and clears `is_loading` when it
/// settles; later ticks leave the flag alone.
pub(crate) async fn poll_loop(
    source: Arc<dyn SnapshotSource>,
    subject_id: String,
    state: Arc<StateCell>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut activation = true;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = source.fetch(&subject_id) => result,
        };

        match &result {
            Ok(snapshot) => {
                debug!(subject = %subject_id, status = ?snapshot.status, "Presence fetched");
            }
            Err(e) => {
                warn!(subject = %subject_id, error = %e, "Presence fetch failed");
            }
        }
        state.fetch_settled(result, activation);
        activation = false;
    }
    debug!(subject = %subject_id, "Poll loop stopped");
}
