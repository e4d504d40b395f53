//! Pairing protocol: turns client requests into registry mutations and the
//! notifications they cause.
//!
//! The handler is synchronous and owns all relay state. It never touches a
//! socket; every operation returns the [`Delivery`] list the caller must
//! send.

use std::collections::HashMap;

use focuspair_common::{ClientMessage, ConnectionId, RelayError, RoomCode, ServerMessage};
use tracing::{debug, info};

use crate::registry::RoomRegistry;

/// A message addressed to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub to: ConnectionId,
    pub message: ServerMessage,
}

impl Delivery {
    pub fn new(to: ConnectionId, message: ServerMessage) -> Self {
        Self { to, message }
    }

    pub(crate) fn error(to: ConnectionId, err: &RelayError) -> Self {
        Self::new(to, ServerMessage::Error(err.client_message().to_string()))
    }
}

/// Owns the room registry plus the room each connection currently sits in.
pub struct PairingHandler {
    pub(crate) registry: RoomRegistry,
    /// conn → room; a connection is in at most one room.
    pub(crate) memberships: HashMap<ConnectionId, RoomCode>,
}

impl Default for PairingHandler {
    fn default() -> Self {
        Self::new(RoomRegistry::new())
    }
}

impl PairingHandler {
    pub fn new(registry: RoomRegistry) -> Self {
        Self {
            registry,
            memberships: HashMap::new(),
        }
    }

    /// Handle one inbound message from `from`.
    pub fn handle(&mut self, from: ConnectionId, message: ClientMessage) -> Vec<Delivery> {
        match message {
            ClientMessage::CreateRoom => self.create_room(from),
            ClientMessage::JoinRoom(code) => self.join_room(from, &RoomCode::parse(code.as_str())),
            ClientMessage::FocusStatus(status) => {
                self.relay_focus(from, status.room_code.as_ref(), status.focused)
            }
        }
    }

    /// Create a room for `from`. A connection already in a room leaves it
    /// first, and its old peer is told.
    pub fn create_room(&mut self, from: ConnectionId) -> Vec<Delivery> {
        let mut out = self.leave(from);

        match self.registry.create_room(from) {
            Ok(code) => {
                info!(conn = %from, room = %code, "Room created");
                self.memberships.insert(from, code.clone());
                out.push(Delivery::new(from, ServerMessage::RoomCreated(code)));
            }
            Err(e) => {
                info!(conn = %from, error = %e, "Room creation failed");
                out.push(Delivery::error(from, &e));
            }
        }
        out
    }

    /// Join `from` to the room under `code` and pair everyone in it.
    ///
    /// A failed join leaves any existing membership untouched.
    pub fn join_room(&mut self, from: ConnectionId, code: &RoomCode) -> Vec<Delivery> {
        if self.memberships.get(&from) == Some(code) {
            return vec![Delivery::error(from, &RelayError::AlreadyMember)];
        }
        if let Err(e) = self.registry.check_joinable(code) {
            debug!(conn = %from, room = %code, error = %e, "Join rejected");
            return vec![Delivery::error(from, &e)];
        }

        let mut out = self.leave(from);

        if let Err(e) = self.registry.join_room(code, from) {
            out.push(Delivery::error(from, &e));
            return out;
        }
        self.memberships.insert(from, code.clone());
        info!(conn = %from, room = %code, "Connection joined room");

        out.extend(
            self.registry
                .members(code)
                .iter()
                .map(|member| Delivery::new(*member, ServerMessage::Paired)),
        );
        out
    }

    /// Transport-level disconnect of `from`.
    pub fn disconnect(&mut self, from: ConnectionId) -> Vec<Delivery> {
        self.leave(from)
    }

    /// Remove `from` from its room and tell whoever is left.
    fn leave(&mut self, from: ConnectionId) -> Vec<Delivery> {
        self.memberships.remove(&from);

        let Some(code) = self.registry.remove_connection(from) else {
            return Vec::new();
        };

        let remaining = self.registry.members(&code);
        if remaining.is_empty() {
            info!(conn = %from, room = %code, "Room closed");
        } else {
            info!(conn = %from, room = %code, "Member left room");
        }
        remaining
            .iter()
            .map(|member| Delivery::new(*member, ServerMessage::PeerDisconnected))
            .collect()
    }

    /// Room `conn` currently belongs to.
    pub fn room_of(&self, conn: ConnectionId) -> Option<&RoomCode> {
        self.memberships.get(&conn)
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }
}
