//! Lanyard presence payloads and their conversion into snapshots.
//!
//! Parsing is lenient: missing or null fields fall back to defaults and
//! an unknown or non-string `discord_status` becomes `Offline`.

use serde::{Deserialize, Deserializer};

use super::types::{
    Activity, ActivityAssets, ActivityKind, DiscordUser, MusicSession, PresenceSnapshot, Status,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawPresence {
    pub user_id: Option<String>,
    pub discord_user: Option<RawUser>,
    pub discord_status: serde_json::Value,
    pub activities: Option<Vec<RawActivity>>,
    pub listening_to_spotify: Option<bool>,
    pub spotify: Option<RawSpotify>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawUser {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    pub global_name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawActivity {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub details: Option<String>,
    pub state: Option<String>,
    pub timestamps: Option<RawTimestamps>,
    pub assets: Option<RawAssets>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawTimestamps {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawAssets {
    pub large_image: Option<String>,
    pub large_text: Option<String>,
    pub small_image: Option<String>,
    pub small_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawSpotify {
    pub track_id: Option<String>,
    pub timestamps: Option<RawTimestamps>,
    #[serde(deserialize_with = "null_as_default")]
    pub album: String,
    pub album_art_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub artist: String,
    #[serde(deserialize_with = "null_as_default")]
    pub song: String,
}

/// `null` reads as the field's default instead of failing the payload.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawPresence {
    /// Id of the subject this payload describes, if the payload names one.
    pub(crate) fn subject_id(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .or_else(|| self.discord_user.as_ref().map(|u| u.id.as_str()))
            .filter(|id| !id.is_empty())
    }

    /// Convert into a snapshot, using `fallback_id` when the payload
    /// does not name its subject.
    pub(crate) fn into_snapshot(self, fallback_id: &str) -> PresenceSnapshot {
        let user_id = self.subject_id().unwrap_or(fallback_id).to_string();
        let status = self
            .discord_status
            .as_str()
            .map(Status::from_wire)
            .unwrap_or_default();

        let music_session = match (self.spotify, self.listening_to_spotify) {
            (Some(spotify), Some(true) | None) => Some(spotify.into_session()),
            _ => None,
        };

        PresenceSnapshot {
            user_id,
            status,
            activities: self
                .activities
                .unwrap_or_default()
                .into_iter()
                .map(RawActivity::into_activity)
                .collect(),
            music_session,
            user: self.discord_user.map(|u| DiscordUser {
                id: u.id,
                username: u.username,
                global_name: u.global_name,
                avatar: u.avatar,
            }),
        }
    }
}

impl RawActivity {
    fn into_activity(self) -> Activity {
        let (started_at, ends_at) = match self.timestamps {
            Some(RawTimestamps { start, end }) => match (start, end) {
                // An end before the start is dropped rather than trusted.
                (Some(s), Some(e)) if e < s => (Some(s), None),
                other => other,
            },
            None => (None, None),
        };

        Activity {
            kind: ActivityKind::from_wire(self.kind),
            label: self.name,
            detail: self.details,
            state: self.state,
            started_at,
            ends_at,
            assets: self.assets.map(|a| ActivityAssets {
                large_image: a.large_image,
                large_text: a.large_text,
                small_image: a.small_image,
                small_text: a.small_text,
            }),
        }
    }
}

impl RawSpotify {
    fn into_session(self) -> MusicSession {
        let timestamps = self.timestamps.unwrap_or_default();
        let started_at = timestamps.start.unwrap_or(0);
        let ends_at = timestamps.end.unwrap_or(started_at).max(started_at);

        MusicSession {
            track_id: self.track_id,
            artist: self.artist,
            title: self.song,
            album: self.album,
            album_art_ref: self.album_art_url,
            started_at,
            ends_at,
        }
    }
}

/// Parse a Lanyard presence object into a snapshot.
///
/// `fallback_id` is used as `user_id` when the payload does not carry one.
pub fn snapshot_from_value(
    value: serde_json::Value,
    fallback_id: &str,
) -> Result<PresenceSnapshot, serde_json::Error> {
    let raw: RawPresence = serde_json::from_value(value)?;
    Ok(raw.into_snapshot(fallback_id))
}
