//! Background task that applies `StreamEvent`s to the subscription state.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::realtime::StreamEvent;

use super::state::StateCell;

/// Runs until the stream client drops its sender.
pub(crate) async fn stream_translator(mut events: mpsc::Receiver<StreamEvent>, state: Arc<StateCell>) {
    while let Some(event) = events.recv().await {
        match event {
            StreamEvent::Link(link) => {
                state.set_link(link);
            }
            StreamEvent::Init(snapshot) => {
                state.adopt_snapshot(snapshot);
            }
            StreamEvent::Update(snapshot) => {
                if !state.merge_update(snapshot) {
                    debug!("Presence update carried no changes");
                }
            }
            StreamEvent::Error(err) => {
                warn!(error = %err, "Presence stream error");
                state.record_error(err);
            }
        }
    }
    debug!("Stream translator finished");
}
