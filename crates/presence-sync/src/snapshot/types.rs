//! Snapshot value types handed to consumers.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Online status of the subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Online,
    Idle,
    DoNotDisturb,
    #[default]
    Offline,
}

impl Status {
    /// Map a wire status string. Anything unrecognized is `Offline`.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "online" => Self::Online,
            "idle" => Self::Idle,
            "dnd" => Self::DoNotDisturb,
            _ => Self::Offline,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Idle => "Away",
            Self::DoNotDisturb => "Do Not Disturb",
            Self::Offline => "Offline",
        }
    }
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

/// Discord activity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Playing,
    Streaming,
    Listening,
    Watching,
    Custom,
    Competing,
    Other(u32),
}

impl ActivityKind {
    pub fn from_wire(value: u32) -> Self {
        match value {
            0 => Self::Playing,
            1 => Self::Streaming,
            2 => Self::Listening,
            3 => Self::Watching,
            4 => Self::Custom,
            5 => Self::Competing,
            n => Self::Other(n),
        }
    }

    /// Verb placed in front of the activity name ("Playing", "Listening to", ...).
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Playing => "Playing",
            Self::Streaming => "Streaming",
            Self::Listening => "Listening to",
            Self::Watching => "Watching",
            Self::Competing => "Competing in",
            Self::Custom | Self::Other(_) => "",
        }
    }
}

/// Media asset references attached to an activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityAssets {
    pub large_image: Option<String>,
    pub large_text: Option<String>,
    pub small_image: Option<String>,
    pub small_text: Option<String>,
}

/// One entry of the subject's activity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub label: String,
    pub detail: Option<String>,
    pub state: Option<String>,
    /// Epoch milliseconds.
    pub started_at: Option<u64>,
    /// Epoch milliseconds, never earlier than `started_at`.
    pub ends_at: Option<u64>,
    pub assets: Option<ActivityAssets>,
}

impl Activity {
    /// Full display label, e.g. "Playing Factorio".
    pub fn title(&self) -> String {
        match self.kind.verb() {
            "" => self.label.clone(),
            verb => format!("{verb} {}", self.label),
        }
    }
}

// ---------------------------------------------------------------------------
// Music
// ---------------------------------------------------------------------------

/// The track the subject is currently listening to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MusicSession {
    pub track_id: Option<String>,
    pub artist: String,
    pub title: String,
    pub album: String,
    pub album_art_ref: Option<String>,
    pub started_at: u64,
    pub ends_at: u64,
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    pub global_name: Option<String>,
    pub avatar: Option<String>,
}

impl DiscordUser {
    /// Global display name, falling back to the username.
    pub fn display_name(&self) -> &str {
        self.global_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }

    /// CDN URL of the user's avatar, if one is set.
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar.as_ref().map(|hash| {
            format!(
                "https://cdn.discordapp.com/avatars/{}/{hash}.png?size=128",
                self.id
            )
        })
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Full known presence state of one subject.
///
/// Snapshots are replaced wholesale, never patched. Equality is content
/// equality and is what decides whether a streamed update is a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceSnapshot {
    pub user_id: String,
    pub status: Status,
    pub activities: Vec<Activity>,
    pub music_session: Option<MusicSession>,
    pub user: Option<DiscordUser>,
}

impl PresenceSnapshot {
    /// An offline snapshot with nothing going on.
    pub fn offline(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            status: Status::Offline,
            activities: Vec::new(),
            music_session: None,
            user: None,
        }
    }

    /// First activity worth headlining.
    ///
    /// The Spotify activity is skipped while a music session is active,
    /// since the session already describes it.
    pub fn main_activity(&self) -> Option<&Activity> {
        let listening = self.music_session.is_some();
        self.activities
            .iter()
            .find(|a| !(listening && a.label == "Spotify"))
    }
}
