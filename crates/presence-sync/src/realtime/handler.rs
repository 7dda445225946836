//! Decides what a decoded frame means for one subscribed subject.

use std::time::Duration;

use tracing::{debug, warn};

use crate::protocol::InboundFrame;
use crate::snapshot::{snapshot_from_value, RawPresence};

use super::types::StreamEvent;

/// What the connection loop should do with a frame.
#[derive(Debug)]
pub(crate) enum FrameAction {
    /// (Re)start the heartbeat timer at this period.
    StartHeartbeat(Duration),
    Emit(StreamEvent),
    Ignore,
}

/// Handle a single decoded frame for `subject_id`.
pub(crate) fn handle_frame(frame: InboundFrame, subject_id: &str) -> FrameAction {
    match frame {
        InboundFrame::Hello { heartbeat_interval } => {
            debug!(interval_ms = heartbeat_interval, "Hello received");
            FrameAction::StartHeartbeat(Duration::from_millis(heartbeat_interval))
        }
        InboundFrame::Init(mut subjects) => {
            let Some(value) = subjects.remove(subject_id) else {
                debug!(subject = %subject_id, "Init state does not include subject");
                return FrameAction::Ignore;
            };
            match snapshot_from_value(value, subject_id) {
                Ok(snapshot) => {
                    debug!(subject = %subject_id, status = ?snapshot.status, "Init state received");
                    FrameAction::Emit(StreamEvent::Init(snapshot))
                }
                Err(e) => {
                    warn!(subject = %subject_id, error = %e, "Malformed init state");
                    FrameAction::Ignore
                }
            }
        }
        InboundFrame::Update(value) => {
            let raw: RawPresence = match serde_json::from_value(value) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(error = %e, "Malformed presence update");
                    return FrameAction::Ignore;
                }
            };
            if raw.subject_id() != Some(subject_id) {
                debug!(
                    target_id = raw.subject_id().unwrap_or(""),
                    "Presence update for another subject"
                );
                return FrameAction::Ignore;
            }
            let snapshot = raw.into_snapshot(subject_id);
            debug!(subject = %subject_id, status = ?snapshot.status, "Presence update received");
            FrameAction::Emit(StreamEvent::Update(snapshot))
        }
        InboundFrame::Unrecognized { op, t } => {
            debug!(op, t = t.as_deref().unwrap_or(""), "Unhandled frame");
            FrameAction::Ignore
        }
    }
}
