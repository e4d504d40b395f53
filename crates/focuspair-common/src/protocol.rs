//! Wire protocol between clients and the relay.
//!
//! Every message is a single JSON text frame shaped as
//! `{"event": "<name>", "data": <payload>}`; `data` is absent for events that
//! carry nothing.

use serde::{Deserialize, Serialize};

use crate::id::RoomCode;

/// Messages a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    CreateRoom,
    JoinRoom(RoomCode),
    FocusStatus(FocusStatus),
}

/// Payload of `focus_status`.
///
/// `room_code` is advisory: the relay always routes through the sender's own
/// room and rejects a code that disagrees with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusStatus {
    #[serde(default, alias = "roomId", skip_serializing_if = "Option::is_none")]
    pub room_code: Option<RoomCode>,
    pub focused: bool,
}

/// Messages the relay sends to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    RoomCreated(RoomCode),
    Paired,
    PeerFocusStatus(bool),
    PeerDisconnected,
    Error(String),
}

impl ClientMessage {
    pub fn decode(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn focus(room_code: Option<RoomCode>, focused: bool) -> Self {
        Self::FocusStatus(FocusStatus { room_code, focused })
    }
}

impl ServerMessage {
    pub fn decode(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
