//! Types shared by the focuspair relay and its clients: the wire protocol,
//! identifiers, and error enums.

pub mod errors;
pub mod id;
pub mod protocol;

pub use errors::{ClientError, ConfigError, RelayError};
pub use id::{ConnectionId, RoomCode};
pub use protocol::{ClientMessage, ServerMessage};
