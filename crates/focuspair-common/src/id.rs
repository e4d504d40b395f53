use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest room code handed out (inclusive).
pub const MIN_ROOM_CODE: u16 = 1000;
/// Highest room code handed out (inclusive).
pub const MAX_ROOM_CODE: u16 = 9999;

/// Opaque identifier the transport assigns to a live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Short numeric code identifying a room. Shown to users so they can share it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Build a code from a number in the four-digit range.
    pub fn from_number(n: u16) -> Self {
        Self(n.to_string())
    }

    /// Wrap user input. Surrounding whitespace is dropped; no other
    /// validation happens here, an unknown code simply matches no room.
    pub fn parse(input: &str) -> Self {
        Self(input.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomCode {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
