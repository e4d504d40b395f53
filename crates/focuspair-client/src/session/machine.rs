//! The focus session state machine.
//!
//! Pure: every input carries the current time, and every transition returns
//! the [`Effect`]s a front-end must apply. Nothing here does I/O.

use std::time::{Duration, Instant};

use focuspair_common::{ClientMessage, RoomCode, ServerMessage};
use tracing::debug;

use super::types::{Effect, Mode, Phase, SessionError, SessionSettings, TimerKind};

/// One client's view of a focus session, solo or paired.
#[derive(Debug, Clone)]
pub struct FocusSession {
    settings: SessionSettings,
    phase: Phase,
    mode: Option<Mode>,
    room: Option<RoomCode>,
    /// When the session became active; drives the clock display.
    started_at: Option<Instant>,
    /// Start of the current stretch; a break needs `break_threshold` since.
    stretch_started_at: Option<Instant>,
    page_visible: bool,
    /// Focus state the peer last heard from us.
    reported_focus: bool,
    peer_focused: bool,
    ambient_volume: f32,
    ambient_playing: bool,
}

impl Default for FocusSession {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

impl FocusSession {
    pub fn new(settings: SessionSettings) -> Self {
        let ambient_volume = settings.ambient_volume;
        Self {
            settings,
            phase: Phase::Idle,
            mode: None,
            room: None,
            started_at: None,
            stretch_started_at: None,
            page_visible: true,
            reported_focus: true,
            peer_focused: true,
            ambient_volume,
            ambient_playing: false,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn room(&self) -> Option<&RoomCode> {
        self.room.as_ref()
    }

    pub fn ambient_volume(&self) -> f32 {
        self.ambient_volume
    }

    /// Active or on break.
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Active { .. } | Phase::OnBreak { .. })
    }

    /// Time since the session became active.
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.started_at
            .map(|started| now.saturating_duration_since(started))
    }

    /// Time left until a break may be taken; zero once it is available.
    /// `None` outside the active phase.
    pub fn break_available_in(&self, now: Instant) -> Option<Duration> {
        if !matches!(self.phase, Phase::Active { .. }) {
            return None;
        }
        let since = now.saturating_duration_since(self.stretch_started_at?);
        Some(self.settings.break_threshold.saturating_sub(since))
    }

    // -----------------------------------------------------------------------
    // User actions
    // -----------------------------------------------------------------------

    /// Ask the relay for a new room.
    pub fn create_room(&mut self) -> Result<Vec<Effect>, SessionError> {
        self.ensure_idle()?;
        self.phase = Phase::Creating;
        Ok(vec![
            Effect::Send(ClientMessage::CreateRoom),
            Effect::SetPairingInput { enabled: false },
            Effect::status("Creating room..."),
        ])
    }

    /// Ask the relay to join the room `input` names.
    pub fn join_room(&mut self, input: &str) -> Result<Vec<Effect>, SessionError> {
        self.ensure_idle()?;
        let code = RoomCode::parse(input);
        if code.is_empty() {
            return Ok(vec![Effect::Notify("Please enter a code".into())]);
        }

        self.room = Some(code.clone());
        self.phase = Phase::Joining { code: code.clone() };
        Ok(vec![
            Effect::Send(ClientMessage::JoinRoom(code)),
            Effect::SetPairingInput { enabled: false },
            Effect::status("Joining room..."),
        ])
    }

    /// Start a session without a peer. Never touches the network.
    pub fn start_solo(&mut self, now: Instant) -> Result<Vec<Effect>, SessionError> {
        self.ensure_idle()?;
        self.mode = Some(Mode::Solo);
        Ok(self.activate(now, "Solo Session Active. Stay focused!"))
    }

    /// The page became visible or hidden.
    pub fn visibility_changed(&mut self, visible: bool) -> Vec<Effect> {
        self.page_visible = visible;

        if !matches!(self.phase, Phase::Active { .. }) {
            return Vec::new();
        }

        match self.mode {
            Some(Mode::Solo) => self.watched_focus_changed(visible),
            Some(Mode::Paired { .. }) => {
                let status = if visible {
                    Effect::status("Welcome back.")
                } else {
                    Effect::alert("You lost focus!")
                };
                vec![self.report_focus(visible), status]
            }
            None => Vec::new(),
        }
    }

    /// Take a break. Only allowed once `break_threshold` has passed since the
    /// session started or the last break ended.
    pub fn start_break(&mut self, now: Instant) -> Result<Vec<Effect>, SessionError> {
        let remaining = self
            .break_available_in(now)
            .ok_or(SessionError::NotActive)?;
        if !remaining.is_zero() {
            return Err(SessionError::BreakNotAvailable { remaining });
        }

        let ringing = matches!(self.phase, Phase::Active { focused: false });
        let until = now
            .checked_add(self.settings.break_duration)
            .unwrap_or_else(|| far_future(now));
        self.phase = Phase::OnBreak { until };

        let mut effects = Vec::new();
        if ringing {
            effects.push(Effect::StopAlarm);
            effects.push(Effect::SetAlert(false));
        }
        effects.push(Effect::StartTimer(TimerKind::Break));
        effects.push(Effect::status(format!(
            "On break for {} min. Focus tracking paused.",
            self.settings.break_duration.as_secs() / 60
        )));
        Ok(effects)
    }

    /// Advance timers. Ends an expired break and reports the clock.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let Phase::OnBreak { until } = self.phase {
            if now >= until {
                effects.extend(self.end_break(now));
            }
        }

        if self.is_running() {
            if let Some(elapsed) = self.elapsed(now) {
                effects.push(Effect::Elapsed(elapsed));
            }
        }
        effects
    }

    /// Manually end the session.
    pub fn end_session(&mut self) -> Vec<Effect> {
        if self.phase == Phase::Disconnected {
            return Vec::new();
        }
        self.shut_down("Session ended.")
    }

    /// The relay connection dropped underneath us.
    pub fn connection_lost(&mut self) -> Vec<Effect> {
        if self.phase == Phase::Disconnected || !self.uses_network() {
            return Vec::new();
        }
        let mut effects = self.shut_down("Connection to relay lost.");
        effects.push(Effect::Notify("Connection to relay lost".into()));
        effects
    }

    /// Leave the disconnected state for a fresh session.
    pub fn restart(&mut self) -> Result<Vec<Effect>, SessionError> {
        if self.phase != Phase::Disconnected {
            return Err(SessionError::AlreadyStarted);
        }
        *self = Self::new(self.settings.clone());
        Ok(vec![
            Effect::ResetView,
            Effect::SetPairingInput { enabled: true },
            Effect::status("Create or join a room."),
        ])
    }

    /// Change the ambient volume; values are clamped to `0.0..=1.0`.
    pub fn set_ambient_volume(&mut self, volume: f32) -> Vec<Effect> {
        if volume.is_nan() {
            return Vec::new();
        }
        self.ambient_volume = volume.clamp(0.0, 1.0);
        if self.ambient_playing {
            vec![Effect::SetAmbientVolume(self.ambient_volume)]
        } else {
            Vec::new()
        }
    }

    // -----------------------------------------------------------------------
    // Relay events
    // -----------------------------------------------------------------------

    /// React to a message from the relay.
    pub fn on_server(&mut self, message: ServerMessage, now: Instant) -> Vec<Effect> {
        match message {
            ServerMessage::RoomCreated(code) => self.on_room_created(code),
            ServerMessage::Paired => self.on_paired(now),
            ServerMessage::PeerFocusStatus(focused) => self.on_peer_focus(focused),
            ServerMessage::PeerDisconnected => self.on_peer_disconnected(),
            ServerMessage::Error(text) => self.on_error(text),
        }
    }

    fn on_room_created(&mut self, code: RoomCode) -> Vec<Effect> {
        if !matches!(self.phase, Phase::Idle | Phase::Creating) {
            debug!(room = %code, phase = ?self.phase, "Ignoring room_created");
            return Vec::new();
        }

        self.room = Some(code.clone());
        self.mode = Some(Mode::Paired { creator: true });
        self.phase = Phase::RoomCreated { code: code.clone() };
        vec![
            Effect::ShowRoomCode(code),
            Effect::SetPairingInput { enabled: false },
            Effect::status("Room created. Waiting for peer to join..."),
        ]
    }

    fn on_paired(&mut self, now: Instant) -> Vec<Effect> {
        let creator = match self.phase {
            Phase::RoomCreated { .. } => true,
            Phase::Joining { .. } | Phase::Idle => false,
            _ => {
                debug!(phase = ?self.phase, "Ignoring paired");
                return Vec::new();
            }
        };
        self.mode = Some(Mode::Paired { creator });
        self.activate(now, "Session Active. Stay focused!")
    }

    fn on_peer_focus(&mut self, focused: bool) -> Vec<Effect> {
        if !matches!(self.mode, Some(Mode::Paired { .. })) {
            return Vec::new();
        }
        self.peer_focused = focused;

        match self.phase {
            Phase::Active { .. } => self.watched_focus_changed(focused),
            // Recorded above; applied when the break ends.
            _ => Vec::new(),
        }
    }

    fn on_peer_disconnected(&mut self) -> Vec<Effect> {
        if !matches!(self.mode, Some(Mode::Paired { .. })) || self.phase == Phase::Disconnected {
            return Vec::new();
        }
        let mut effects = self.shut_down("Peer disconnected. Session ended.");
        effects.push(Effect::Notify("Peer disconnected".into()));
        effects
    }

    fn on_error(&mut self, text: String) -> Vec<Effect> {
        let mut effects = vec![Effect::Notify(text)];
        if matches!(self.phase, Phase::Creating | Phase::Joining { .. }) {
            self.phase = Phase::Idle;
            self.mode = None;
            self.room = None;
            effects.push(Effect::SetPairingInput { enabled: true });
        }
        effects
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.phase == Phase::Idle {
            Ok(())
        } else {
            Err(SessionError::AlreadyStarted)
        }
    }

    fn uses_network(&self) -> bool {
        matches!(self.mode, Some(Mode::Paired { .. }))
            || matches!(
                self.phase,
                Phase::Creating | Phase::RoomCreated { .. } | Phase::Joining { .. }
            )
    }

    fn plays_ambient(&self) -> bool {
        matches!(
            self.mode,
            Some(Mode::Solo) | Some(Mode::Paired { creator: true })
        )
    }

    fn report_focus(&mut self, focused: bool) -> Effect {
        self.reported_focus = focused;
        Effect::Send(ClientMessage::focus(self.room.clone(), focused))
    }

    fn play_ambient(&mut self) -> Effect {
        self.ambient_playing = true;
        Effect::PlayAmbient {
            volume: self.ambient_volume,
        }
    }

    fn activate(&mut self, now: Instant, status: &str) -> Vec<Effect> {
        self.phase = Phase::Active { focused: true };
        self.started_at = Some(now);
        self.stretch_started_at = Some(now);
        self.peer_focused = true;
        self.reported_focus = true;

        let mut effects = vec![
            Effect::ShowFocusView,
            Effect::status(status),
            Effect::StartTimer(TimerKind::Clock),
            Effect::Elapsed(Duration::ZERO),
        ];
        if self.plays_ambient() {
            effects.push(self.play_ambient());
        }
        effects
    }

    /// The watched party (peer, or this page in solo mode) gained or lost
    /// focus while active.
    fn watched_focus_changed(&mut self, focused: bool) -> Vec<Effect> {
        self.phase = Phase::Active { focused };
        let solo = self.mode == Some(Mode::Solo);

        if !focused {
            let text = if solo { "You lost focus!" } else { "PEER LOST FOCUS!" };
            return vec![Effect::alert(text), Effect::PlayAlarm, Effect::SetAlert(true)];
        }

        let text = if solo { "Welcome back." } else { "Peer is focused." };
        let mut effects = vec![Effect::status(text), Effect::StopAlarm, Effect::SetAlert(false)];
        if self.plays_ambient() {
            effects.push(self.play_ambient());
        }
        effects
    }

    fn end_break(&mut self, now: Instant) -> Vec<Effect> {
        self.stretch_started_at = Some(now);
        self.phase = Phase::Active { focused: true };

        let mut effects = vec![
            Effect::CancelTimer(TimerKind::Break),
            Effect::status("Break over. Stay focused!"),
        ];

        match self.mode {
            Some(Mode::Solo) if !self.page_visible => {
                effects.extend(self.watched_focus_changed(false));
            }
            Some(Mode::Paired { .. }) => {
                if self.page_visible != self.reported_focus {
                    effects.push(self.report_focus(self.page_visible));
                }
                if !self.peer_focused {
                    effects.extend(self.watched_focus_changed(false));
                }
            }
            _ => {}
        }
        effects
    }

    fn shut_down(&mut self, text: &str) -> Vec<Effect> {
        let mut effects = vec![Effect::StopAlarm];
        if self.ambient_playing {
            effects.push(Effect::StopAmbient);
            self.ambient_playing = false;
        }
        effects.push(Effect::SetAlert(false));
        if self.started_at.is_some() {
            effects.push(Effect::CancelTimer(TimerKind::Clock));
        }
        if matches!(self.phase, Phase::OnBreak { .. }) {
            effects.push(Effect::CancelTimer(TimerKind::Break));
        }
        effects.push(Effect::alert(text));
        if self.uses_network() {
            effects.push(Effect::Disconnect);
        }

        self.phase = Phase::Disconnected;
        effects
    }
}

/// Latest deadline representable after `now`, for break lengths that
/// overflow `Instant`.
fn far_future(now: Instant) -> Instant {
    let mut step = Duration::from_secs(u64::MAX / 2);
    let mut until = now;
    while !step.is_zero() {
        if let Some(later) = until.checked_add(step) {
            until = later;
        }
        step /= 2;
    }
    until
}
