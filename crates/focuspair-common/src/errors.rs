use std::path::PathBuf;

/// Message sent for both unknown and full rooms. Clients cannot tell the two
/// apart.
pub const ROOM_UNAVAILABLE: &str = "Room invalid or full";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    #[error("room not found")]
    RoomNotFound,

    #[error("room is full")]
    RoomFull,

    #[error("connection is already a member of this room")]
    AlreadyMember,

    #[error("connection is not a member of the addressed room")]
    Unauthorized,

    #[error("no free room codes left")]
    CodesExhausted,
}

impl RelayError {
    /// Human-readable text sent to the requesting client.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::RoomNotFound | Self::RoomFull => ROOM_UNAVAILABLE,
            Self::AlreadyMember => "Already in this room",
            Self::Unauthorized => "Not a member of this room",
            Self::CodesExhausted => "No rooms available, try again later",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
