//! Turns snapshots and sync state into terminal output.

use presence_sync::{PresenceSnapshot, SyncState};

/// How snapshots are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Summary,
    Json,
}

/// Name to show for the subject: the configured override, else the
/// Discord display name, else the raw id.
pub fn subject_name<'a>(display_name: &'a str, snapshot: &'a PresenceSnapshot) -> &'a str {
    if !display_name.is_empty() {
        return display_name;
    }
    snapshot
        .user
        .as_ref()
        .map(|u| u.display_name())
        .filter(|name| !name.is_empty())
        .unwrap_or(&snapshot.user_id)
}

pub fn render_snapshot(
    snapshot: &PresenceSnapshot,
    display_name: &str,
    format: Format,
    now_ms: u64,
) -> String {
    match format {
        Format::Summary => format!(
            "{}: {}",
            subject_name(display_name, snapshot),
            snapshot.summary_line(now_ms)
        ),
        Format::Json => serde_json::to_string(snapshot)
            .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize snapshot: {e}\"}}")),
    }
}

/// Line for the current state, or `None` while nothing is known yet.
pub fn render_state(
    state: &SyncState,
    display_name: &str,
    format: Format,
    now_ms: u64,
) -> Option<String> {
    let mut line = match &state.snapshot {
        Some(snapshot) => render_snapshot(snapshot, display_name, format, now_ms),
        None if state.is_loading => return None,
        None => "(no presence available)".to_string(),
    };
    if format == Format::Summary {
        if let Some(err) = &state.last_error {
            line.push_str(&format!(" [{err}]"));
        }
    }
    Some(line)
}
