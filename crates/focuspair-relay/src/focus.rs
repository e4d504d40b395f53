//! Focus relay: forwards a member's focus flag to the rest of its room.

use focuspair_common::{ConnectionId, RelayError, RoomCode, ServerMessage};
use tracing::{debug, warn};

use crate::pairing::{Delivery, PairingHandler};

impl PairingHandler {
    /// Forward `focused` from `from` to every other member of its room.
    ///
    /// Routing uses the sender's tracked room. `claimed` is the code the
    /// client put in the message, if any; it must match.
    pub fn relay_focus(
        &self,
        from: ConnectionId,
        claimed: Option<&RoomCode>,
        focused: bool,
    ) -> Vec<Delivery> {
        let Some(room) = self.memberships.get(&from) else {
            warn!(conn = %from, "Focus status from connection outside any room");
            return vec![Delivery::error(from, &RelayError::Unauthorized)];
        };

        if let Some(claimed) = claimed {
            if RoomCode::parse(claimed.as_str()) != *room {
                warn!(conn = %from, room = %room, claimed = %claimed, "Focus status for foreign room");
                return vec![Delivery::error(from, &RelayError::Unauthorized)];
            }
        }

        debug!(conn = %from, room = %room, focused, "Relaying focus status");
        self.registry
            .members(room)
            .iter()
            .filter(|member| **member != from)
            .map(|member| Delivery::new(*member, ServerMessage::PeerFocusStatus(focused)))
            .collect()
    }
}
