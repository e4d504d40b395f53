//! Room registry: maps room codes to the connections sitting in them.

use std::collections::HashMap;

use focuspair_common::id::{MAX_ROOM_CODE, MIN_ROOM_CODE};
use focuspair_common::{ConnectionId, RelayError, RoomCode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A room holds at most this many members.
pub const ROOM_CAPACITY: usize = 2;

/// Number of distinct codes the generator can produce.
const CODE_SPACE: usize = (MAX_ROOM_CODE - MIN_ROOM_CODE) as usize + 1;

/// A pairing unit. Members are kept in join order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub members: Vec<ConnectionId>,
}

impl Room {
    fn is_full(&self) -> bool {
        self.members.len() >= ROOM_CAPACITY
    }
}

/// In-memory room table. Not thread-safe on its own; the relay keeps it
/// behind a single lock.
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
    rng: StdRng,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Registry with a deterministic code sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rooms: HashMap::new(),
            rng,
        }
    }

    /// Create a room with `creator` as its only member and return its code.
    ///
    /// Codes are unique among live rooms.
    pub fn create_room(&mut self, creator: ConnectionId) -> Result<RoomCode, RelayError> {
        if self.rooms.len() >= CODE_SPACE {
            return Err(RelayError::CodesExhausted);
        }

        let code = loop {
            let candidate = RoomCode::from_number(self.rng.gen_range(MIN_ROOM_CODE..=MAX_ROOM_CODE));
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };

        self.rooms.insert(
            code.clone(),
            Room {
                members: vec![creator],
            },
        );
        Ok(code)
    }

    /// Append `conn` to the room under `code`.
    pub fn join_room(&mut self, code: &RoomCode, conn: ConnectionId) -> Result<(), RelayError> {
        let room = self.rooms.get_mut(code).ok_or(RelayError::RoomNotFound)?;
        if room.is_full() {
            return Err(RelayError::RoomFull);
        }
        room.members.push(conn);
        Ok(())
    }

    /// Check that `code` names a room with a free seat, without joining.
    pub fn check_joinable(&self, code: &RoomCode) -> Result<(), RelayError> {
        match self.rooms.get(code) {
            None => Err(RelayError::RoomNotFound),
            Some(room) if room.is_full() => Err(RelayError::RoomFull),
            Some(_) => Ok(()),
        }
    }

    /// Remove `conn` from the first room listing it. An emptied room is
    /// deleted. Returns the code of the affected room, if any.
    pub fn remove_connection(&mut self, conn: ConnectionId) -> Option<RoomCode> {
        let (code, now_empty) = self.rooms.iter_mut().find_map(|(code, room)| {
            let index = room.members.iter().position(|m| *m == conn)?;
            room.members.remove(index);
            Some((code.clone(), room.members.is_empty()))
        })?;

        if now_empty {
            self.rooms.remove(&code);
        }
        Some(code)
    }

    /// Members of the room under `code`, in join order.
    pub fn members(&self, code: &RoomCode) -> &[ConnectionId] {
        self.rooms
            .get(code)
            .map(|room| room.members.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
