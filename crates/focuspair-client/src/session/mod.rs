//! Client-side focus session.
//!
//! Tracks where one client is in the pairing flow, reacts to relay events
//! and page visibility, and decides when alarms, ambient music and timers
//! run. Timers are scoped to the state that owns them: entering the state
//! emits `StartTimer`, leaving it emits `CancelTimer`.

mod machine;
mod types;

#[cfg(test)]
mod tests;

pub use machine::FocusSession;
pub use types::{Effect, Mode, Phase, SessionError, SessionSettings, TimerKind};
