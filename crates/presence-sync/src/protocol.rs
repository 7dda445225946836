//! Lanyard socket protocol: frame envelope, opcodes, and frame decoding.
//!
//! Every frame is a JSON object `{op, t?, d?}`. Inbound frames are decoded
//! into [`InboundFrame`], discriminated by the `(op, t)` pair; anything we
//! do not understand becomes [`InboundFrame::Unrecognized`] and is ignored.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Opcodes and event names
// ---------------------------------------------------------------------------

pub mod op {
    /// Server → client event carrying `t` and `d`.
    pub const EVENT: u64 = 0;
    /// Server → client greeting with the heartbeat interval.
    pub const HELLO: u64 = 1;
    /// Client → server subscription request.
    pub const INITIALIZE: u64 = 2;
    /// Client → server keepalive.
    pub const HEARTBEAT: u64 = 3;
}

pub mod events {
    pub const INIT_STATE: &str = "INIT_STATE";
    pub const PRESENCE_UPDATE: &str = "PRESENCE_UPDATE";
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Raw frame envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub op: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<serde_json::Value>,
}

impl Envelope {
    /// `{op: 2, d: {subscribe_to_ids: [subject_id]}}`
    pub fn subscribe(subject_id: &str) -> Self {
        Self {
            op: op::INITIALIZE,
            t: None,
            d: Some(serde_json::json!({ "subscribe_to_ids": [subject_id] })),
        }
    }

    /// `{op: 3}`
    pub fn heartbeat() -> Self {
        Self {
            op: op::HEARTBEAT,
            t: None,
            d: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound frames
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("invalid frame json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} frame has no payload")]
    MissingPayload(&'static str),

    #[error("{0} payload is not an object")]
    NotAnObject(&'static str),

    #[error("hello frame has a zero heartbeat interval")]
    ZeroHeartbeat,
}

#[derive(Deserialize)]
struct HelloPayload {
    heartbeat_interval: u64,
}

/// A decoded server frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    /// Heartbeat cadence in milliseconds.
    Hello { heartbeat_interval: u64 },
    /// Map of subject id → presence object.
    Init(serde_json::Map<String, serde_json::Value>),
    /// A single presence object, addressed by its `user_id`.
    Update(serde_json::Value),
    Unrecognized { op: u64, t: Option<String> },
}

impl InboundFrame {
    pub fn decode(text: &str) -> Result<Self, FrameError> {
        let envelope: Envelope = serde_json::from_str(text)?;

        match (envelope.op, envelope.t.as_deref()) {
            (op::HELLO, _) => {
                let d = envelope.d.ok_or(FrameError::MissingPayload("hello"))?;
                let hello: HelloPayload = serde_json::from_value(d)?;
                if hello.heartbeat_interval == 0 {
                    return Err(FrameError::ZeroHeartbeat);
                }
                Ok(Self::Hello {
                    heartbeat_interval: hello.heartbeat_interval,
                })
            }
            (op::EVENT, Some(events::INIT_STATE)) => {
                match envelope.d.ok_or(FrameError::MissingPayload("init"))? {
                    serde_json::Value::Object(map) => Ok(Self::Init(map)),
                    _ => Err(FrameError::NotAnObject("init")),
                }
            }
            (op::EVENT, Some(events::PRESENCE_UPDATE)) => {
                let d = envelope.d.ok_or(FrameError::MissingPayload("update"))?;
                Ok(Self::Update(d))
            }
            (code, t) => Ok(Self::Unrecognized {
                op: code,
                t: t.map(str::to_string),
            }),
        }
    }
}
