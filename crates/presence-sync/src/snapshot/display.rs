//! Text helpers for consumers that present a snapshot.

use std::time::{SystemTime, UNIX_EPOCH};

use super::types::PresenceSnapshot;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> u64 {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Elapsed time since `start_ms` as `"1h 2m 3s"`; hours are omitted when zero.
pub fn format_elapsed(start_ms: u64, now_ms: u64) -> String {
    let elapsed = now_ms.saturating_sub(start_ms);
    let hours = elapsed / 3_600_000;
    let minutes = (elapsed % 3_600_000) / 60_000;
    let seconds = (elapsed % 60_000) / 1000;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else {
        format!("{minutes}m {seconds}s")
    }
}

impl PresenceSnapshot {
    /// One-line summary: status, headline activity, and current track.
    pub fn summary_line(&self, now_ms: u64) -> String {
        let mut line = self.status.label().to_string();

        if let Some(activity) = self.main_activity() {
            line.push_str(" | ");
            line.push_str(&activity.title());
            if let Some(detail) = &activity.detail {
                line.push_str(&format!(" ({detail})"));
            }
            if let Some(start) = activity.started_at {
                line.push_str(&format!(", {} elapsed", format_elapsed(start, now_ms)));
            }
        }

        if let Some(music) = &self.music_session {
            line.push_str(&format!(" | Listening to {} by {}", music.title, music.artist));
        }

        line
    }
}
