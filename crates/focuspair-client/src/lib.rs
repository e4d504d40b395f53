//! focuspair-client: terminal front-end for two-person focus sessions.
//!
//! The [`session`] module holds the client state machine; [`app`] drives it
//! from stdin, the relay connection and a one-second ticker.

pub mod app;
pub mod clock;
pub mod command;
pub mod connection;
pub mod presenter;
pub mod session;

pub use app::App;
pub use command::{parse_command, Command};
pub use connection::RelayConnection;
pub use presenter::{Presenter, TerminalPresenter};
pub use session::{Effect, FocusSession, Mode, Phase, SessionError, SessionSettings, TimerKind};
