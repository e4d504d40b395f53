//! focuspair-relay: pairs two clients into a room and relays their focus
//! state.
//!
//! Clients connect over WebSocket, create or join a four-digit room, and
//! from then on every `focus_status` they send reaches their peer. The
//! relay keeps nothing beyond who sits in which room.

pub mod connection;
pub mod focus;
pub mod net;
pub mod pairing;
pub mod registry;
pub mod store;
pub mod web;

pub use pairing::{Delivery, PairingHandler};
pub use registry::{RoomRegistry, ROOM_CAPACITY};
pub use store::{RoomStore, StoreStats};
pub use web::{router, serve};
