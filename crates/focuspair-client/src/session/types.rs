//! States, settings, and effects of a focus session.

use std::time::{Duration, Instant};

use focuspair_common::{ClientMessage, RoomCode};
use focuspair_config::SessionConfig;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Tunables for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// How long a session must run (since start or the last break) before a
    /// break can be taken.
    pub break_threshold: Duration,
    /// Length of a break.
    pub break_duration: Duration,
    /// Initial ambient volume, 0.0 to 1.0.
    pub ambient_volume: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for SessionSettings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            break_threshold: config.break_threshold(),
            break_duration: config.break_duration(),
            ambient_volume: config.ambient_volume.clamp(0.0, 1.0),
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Whether the session has a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Solo,
    Paired {
        /// The room creator is the one who plays ambient music.
        creator: bool,
    },
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Create request sent, no code yet.
    Creating,
    /// Room exists, waiting for a peer.
    RoomCreated { code: RoomCode },
    /// Join request sent, waiting for `paired`.
    Joining { code: RoomCode },
    /// Session running. `focused` is the watched party's focus: the peer in
    /// paired mode, this page in solo mode.
    Active { focused: bool },
    /// Focus-loss handling suspended until `until`.
    OnBreak { until: Instant },
    /// Terminal; only `restart` leaves it.
    Disconnected,
}

/// Repeating timers a front-end has to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Elapsed-time display, live from activation until the session ends.
    Clock,
    /// Break countdown, live while on break.
    Break,
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Something the front-end must do in response to a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send to the relay.
    Send(ClientMessage),
    /// Close the relay connection.
    Disconnect,
    /// Replace the status line. `alert` marks it as bad news.
    Status { text: String, alert: bool },
    /// Show the code a peer should type in.
    ShowRoomCode(RoomCode),
    /// Enable or disable the create/join controls.
    SetPairingInput { enabled: bool },
    /// Swap the pairing view for the focus view.
    ShowFocusView,
    /// Start the looping alarm.
    PlayAlarm,
    /// Stop the alarm and rewind it.
    StopAlarm,
    PlayAmbient { volume: f32 },
    StopAmbient,
    SetAmbientVolume(f32),
    /// Turn the visual alert on or off.
    SetAlert(bool),
    StartTimer(TimerKind),
    CancelTimer(TimerKind),
    /// Time since the session became active, for the clock display.
    Elapsed(Duration),
    /// Modal notice for the user.
    Notify(String),
    /// Back to the initial pairing view.
    ResetView,
}

impl Effect {
    pub(crate) fn status(text: impl Into<String>) -> Self {
        Self::Status {
            text: text.into(),
            alert: false,
        }
    }

    pub(crate) fn alert(text: impl Into<String>) -> Self {
        Self::Status {
            text: text.into(),
            alert: true,
        }
    }
}

/// Errors from user actions the current state does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no active session")]
    NotActive,

    #[error("a session is already in progress")]
    AlreadyStarted,

    #[error("break available in {} s", remaining.as_secs())]
    BreakNotAvailable { remaining: Duration },
}
