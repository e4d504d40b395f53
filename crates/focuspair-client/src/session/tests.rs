//! Tests for the focus session state machine.

use std::time::{Duration, Instant};

use focuspair_common::{ClientMessage, RoomCode, ServerMessage};

use super::*;

const MIN: Duration = Duration::from_secs(60);

fn settings() -> SessionSettings {
    SessionSettings {
        break_threshold: 30 * MIN,
        break_duration: 10 * MIN,
        ambient_volume: 0.2,
    }
}

fn code() -> RoomCode {
    RoomCode::from("4821")
}

/// Creator side of a paired session, already active at `t0`.
fn paired_creator(t0: Instant) -> FocusSession {
    let mut s = FocusSession::new(settings());
    s.create_room().unwrap();
    s.on_server(ServerMessage::RoomCreated(code()), t0);
    s.on_server(ServerMessage::Paired, t0);
    s
}

/// Joiner side of a paired session, already active at `t0`.
fn paired_joiner(t0: Instant) -> FocusSession {
    let mut s = FocusSession::new(settings());
    s.join_room("4821").unwrap();
    s.on_server(ServerMessage::Paired, t0);
    s
}

fn solo(t0: Instant) -> FocusSession {
    let mut s = FocusSession::new(settings());
    s.start_solo(t0).unwrap();
    s
}

fn has(effects: &[Effect], wanted: &Effect) -> bool {
    effects.iter().any(|e| e == wanted)
}

#[test]
fn create_sends_request_and_locks_input() {
    let mut s = FocusSession::new(settings());
    let fx = s.create_room().unwrap();
    assert!(has(&fx, &Effect::Send(ClientMessage::CreateRoom)));
    assert!(has(&fx, &Effect::SetPairingInput { enabled: false }));
    assert_eq!(s.phase(), &Phase::Creating);
}

#[test]
fn room_created_shows_code() {
    let mut s = FocusSession::new(settings());
    s.create_room().unwrap();
    let fx = s.on_server(ServerMessage::RoomCreated(code()), Instant::now());
    assert!(has(&fx, &Effect::ShowRoomCode(code())));
    assert_eq!(s.phase(), &Phase::RoomCreated { code: code() });
    assert_eq!(s.room(), Some(&code()));
    assert_eq!(s.mode(), Some(Mode::Paired { creator: true }));
}

#[test]
fn second_create_is_refused() {
    let mut s = FocusSession::new(settings());
    s.create_room().unwrap();
    assert_eq!(s.create_room(), Err(SessionError::AlreadyStarted));
    assert_eq!(s.join_room("1234"), Err(SessionError::AlreadyStarted));
}

#[test]
fn empty_join_code_is_not_sent() {
    let mut s = FocusSession::new(settings());
    let fx = s.join_room("   ").unwrap();
    assert_eq!(fx, vec![Effect::Notify("Please enter a code".into())]);
    assert_eq!(s.phase(), &Phase::Idle);
}

#[test]
fn join_sends_trimmed_code() {
    let mut s = FocusSession::new(settings());
    let fx = s.join_room(" 4821 ").unwrap();
    assert!(has(&fx, &Effect::Send(ClientMessage::JoinRoom(code()))));
    assert_eq!(s.phase(), &Phase::Joining { code: code() });
}

#[test]
fn join_error_returns_to_idle() {
    let mut s = FocusSession::new(settings());
    s.join_room("9999").unwrap();
    let fx = s.on_server(
        ServerMessage::Error("Room invalid or full".into()),
        Instant::now(),
    );
    assert!(has(&fx, &Effect::Notify("Room invalid or full".into())));
    assert!(has(&fx, &Effect::SetPairingInput { enabled: true }));
    assert_eq!(s.phase(), &Phase::Idle);
    assert!(s.join_room("4821").is_ok());
}

#[test]
fn paired_starts_clock_and_creator_music() {
    let t0 = Instant::now();
    let mut s = FocusSession::new(settings());
    s.create_room().unwrap();
    s.on_server(ServerMessage::RoomCreated(code()), t0);
    let fx = s.on_server(ServerMessage::Paired, t0);

    assert!(has(&fx, &Effect::ShowFocusView));
    assert!(has(&fx, &Effect::StartTimer(TimerKind::Clock)));
    assert!(has(&fx, &Effect::PlayAmbient { volume: 0.2 }));
    assert_eq!(s.phase(), &Phase::Active { focused: true });
    assert_eq!(s.elapsed(t0 + Duration::from_secs(5)), Some(Duration::from_secs(5)));
}

#[test]
fn joiner_does_not_play_music() {
    let t0 = Instant::now();
    let mut s = FocusSession::new(settings());
    s.join_room("4821").unwrap();
    let fx = s.on_server(ServerMessage::Paired, t0);
    assert!(!fx.iter().any(|e| matches!(e, Effect::PlayAmbient { .. })));
    assert_eq!(s.mode(), Some(Mode::Paired { creator: false }));
}

#[test]
fn peer_focus_loss_rings_alarm_and_recovery_stops_it() {
    let t0 = Instant::now();
    let mut s = paired_joiner(t0);

    let fx = s.on_server(ServerMessage::PeerFocusStatus(false), t0);
    assert!(has(&fx, &Effect::PlayAlarm));
    assert!(has(&fx, &Effect::SetAlert(true)));
    assert_eq!(s.phase(), &Phase::Active { focused: false });

    let fx = s.on_server(ServerMessage::PeerFocusStatus(true), t0);
    assert!(has(&fx, &Effect::StopAlarm));
    assert!(has(&fx, &Effect::SetAlert(false)));
    assert_eq!(s.phase(), &Phase::Active { focused: true });
}

#[test]
fn creator_music_resumes_after_peer_refocus() {
    let t0 = Instant::now();
    let mut s = paired_creator(t0);
    s.on_server(ServerMessage::PeerFocusStatus(false), t0);
    let fx = s.on_server(ServerMessage::PeerFocusStatus(true), t0);
    assert!(has(&fx, &Effect::PlayAmbient { volume: 0.2 }));
}

#[test]
fn paired_visibility_is_reported_not_alarmed() {
    let t0 = Instant::now();
    let mut s = paired_creator(t0);

    let fx = s.visibility_changed(false);
    assert!(has(&fx, &Effect::Send(ClientMessage::focus(Some(code()), false))));
    assert!(!has(&fx, &Effect::PlayAlarm));

    let fx = s.visibility_changed(true);
    assert!(has(&fx, &Effect::Send(ClientMessage::focus(Some(code()), true))));
}

#[test]
fn visibility_before_activation_is_ignored() {
    let mut s = FocusSession::new(settings());
    s.create_room().unwrap();
    assert!(s.visibility_changed(false).is_empty());
}

#[test]
fn solo_mode_alarms_locally_without_network() {
    let t0 = Instant::now();
    let mut s = FocusSession::new(settings());
    let fx = s.start_solo(t0).unwrap();
    assert!(has(&fx, &Effect::PlayAmbient { volume: 0.2 }));
    assert!(!fx.iter().any(|e| matches!(e, Effect::Send(_))));

    let fx = s.visibility_changed(false);
    assert!(has(&fx, &Effect::PlayAlarm));
    assert!(!fx.iter().any(|e| matches!(e, Effect::Send(_))));

    let fx = s.visibility_changed(true);
    assert!(has(&fx, &Effect::StopAlarm));
    assert!(has(&fx, &Effect::PlayAmbient { volume: 0.2 }));
}

#[test]
fn solo_ignores_relay_events() {
    let t0 = Instant::now();
    let mut s = solo(t0);
    assert!(s.on_server(ServerMessage::PeerFocusStatus(false), t0).is_empty());
    assert!(s.on_server(ServerMessage::PeerDisconnected, t0).is_empty());
    assert_eq!(s.phase(), &Phase::Active { focused: true });
}

#[test]
fn break_is_refused_before_threshold() {
    let t0 = Instant::now();
    let mut s = solo(t0);
    let err = s.start_break(t0 + 10 * MIN).unwrap_err();
    assert_eq!(
        err,
        SessionError::BreakNotAvailable {
            remaining: 20 * MIN
        }
    );
    assert_eq!(s.break_available_in(t0 + 30 * MIN), Some(Duration::ZERO));
}

#[test]
fn break_requires_active_session() {
    let mut s = FocusSession::new(settings());
    assert_eq!(s.start_break(Instant::now()), Err(SessionError::NotActive));
}

#[test]
fn break_suspends_focus_handling_then_resumes() {
    let t0 = Instant::now();
    let mut s = solo(t0);

    let t_break = t0 + 30 * MIN;
    let fx = s.start_break(t_break).unwrap();
    assert!(has(&fx, &Effect::StartTimer(TimerKind::Break)));
    assert_eq!(
        s.phase(),
        &Phase::OnBreak {
            until: t_break + 10 * MIN
        }
    );

    // Looking away during the break does nothing.
    assert!(s.visibility_changed(false).is_empty());
    assert!(s.visibility_changed(true).is_empty());

    // Still on break just before the end.
    let fx = s.tick(t_break + 10 * MIN - Duration::from_secs(1));
    assert!(!has(&fx, &Effect::CancelTimer(TimerKind::Break)));

    let t_end = t_break + 10 * MIN;
    let fx = s.tick(t_end);
    assert!(has(&fx, &Effect::CancelTimer(TimerKind::Break)));
    assert_eq!(s.phase(), &Phase::Active { focused: true });

    // Focus handling is back.
    let fx = s.visibility_changed(false);
    assert!(has(&fx, &Effect::PlayAlarm));
    s.visibility_changed(true);

    // The threshold counter restarted at the end of the break.
    assert_eq!(s.break_available_in(t_end), Some(30 * MIN));
    assert!(s.start_break(t_end + 29 * MIN).is_err());
    assert!(s.start_break(t_end + 30 * MIN).is_ok());
}

#[test]
fn break_silences_a_ringing_alarm() {
    let t0 = Instant::now();
    let mut s = paired_joiner(t0);
    s.on_server(ServerMessage::PeerFocusStatus(false), t0);

    let fx = s.start_break(t0 + 30 * MIN).unwrap();
    assert!(has(&fx, &Effect::StopAlarm));
    assert!(has(&fx, &Effect::SetAlert(false)));
}

#[test]
fn paired_break_suppresses_relay_and_replays_state_after() {
    let t0 = Instant::now();
    let mut s = paired_creator(t0);
    let t_break = t0 + 30 * MIN;
    s.start_break(t_break).unwrap();

    assert!(s.visibility_changed(false).is_empty());
    assert!(s
        .on_server(ServerMessage::PeerFocusStatus(false), t_break)
        .is_empty());

    let fx = s.tick(t_break + 10 * MIN);
    assert!(has(&fx, &Effect::Send(ClientMessage::focus(Some(code()), false))));
    assert!(has(&fx, &Effect::PlayAlarm));
    assert_eq!(s.phase(), &Phase::Active { focused: false });
}

#[test]
fn return_during_break_is_reported_when_break_ends() {
    let t0 = Instant::now();
    let mut s = paired_creator(t0);

    let fx = s.visibility_changed(false);
    assert!(has(&fx, &Effect::Send(ClientMessage::focus(Some(code()), false))));

    let t_break = t0 + 31 * MIN;
    s.start_break(t_break).unwrap();
    assert!(s.visibility_changed(true).is_empty());

    let fx = s.tick(t_break + 10 * MIN);
    assert!(has(&fx, &Effect::Send(ClientMessage::focus(Some(code()), true))));
    assert!(!has(&fx, &Effect::Send(ClientMessage::focus(Some(code()), false))));
}

#[test]
fn unchanged_focus_is_not_resent_after_break() {
    let t0 = Instant::now();
    let mut s = paired_creator(t0);
    s.visibility_changed(false);

    let t_break = t0 + 30 * MIN;
    s.start_break(t_break).unwrap();

    let fx = s.tick(t_break + 10 * MIN);
    assert!(!fx.iter().any(|e| matches!(e, Effect::Send(_))));
}

#[test]
fn oversized_break_does_not_overflow() {
    let t0 = Instant::now();
    let mut s = FocusSession::new(SessionSettings {
        break_threshold: Duration::ZERO,
        break_duration: Duration::from_secs(u64::MAX),
        ambient_volume: 0.2,
    });
    s.start_solo(t0).unwrap();

    s.start_break(t0).unwrap();
    assert!(matches!(s.phase(), Phase::OnBreak { until } if *until > t0));
    assert!(!has(&s.tick(t0 + 10 * MIN), &Effect::CancelTimer(TimerKind::Break)));
}

#[test]
fn tick_reports_elapsed_time() {
    let t0 = Instant::now();
    let mut s = solo(t0);
    let fx = s.tick(t0 + Duration::from_secs(75));
    assert_eq!(fx, vec![Effect::Elapsed(Duration::from_secs(75))]);
}

#[test]
fn tick_when_idle_is_silent() {
    let mut s = FocusSession::new(settings());
    assert!(s.tick(Instant::now()).is_empty());
}

#[test]
fn peer_disconnect_tears_everything_down() {
    let t0 = Instant::now();
    let mut s = paired_creator(t0);
    s.on_server(ServerMessage::PeerFocusStatus(false), t0);

    let fx = s.on_server(ServerMessage::PeerDisconnected, t0);
    assert!(has(&fx, &Effect::StopAlarm));
    assert!(has(&fx, &Effect::StopAmbient));
    assert!(has(&fx, &Effect::SetAlert(false)));
    assert!(has(&fx, &Effect::CancelTimer(TimerKind::Clock)));
    assert!(has(&fx, &Effect::Disconnect));
    assert!(has(&fx, &Effect::Notify("Peer disconnected".into())));
    assert_eq!(s.phase(), &Phase::Disconnected);

    // No resume: further events are ignored.
    assert!(s.on_server(ServerMessage::PeerFocusStatus(true), t0).is_empty());
    assert!(s.visibility_changed(false).is_empty());
    assert!(s.tick(t0 + MIN).is_empty());
}

#[test]
fn ending_a_break_session_cancels_both_timers() {
    let t0 = Instant::now();
    let mut s = solo(t0);
    s.start_break(t0 + 30 * MIN).unwrap();
    let fx = s.end_session();
    assert!(has(&fx, &Effect::CancelTimer(TimerKind::Clock)));
    assert!(has(&fx, &Effect::CancelTimer(TimerKind::Break)));
    assert!(!has(&fx, &Effect::Disconnect));
}

#[test]
fn end_session_closes_connection_in_paired_mode() {
    let t0 = Instant::now();
    let mut s = paired_joiner(t0);
    let fx = s.end_session();
    assert!(has(&fx, &Effect::Disconnect));
    assert!(s.end_session().is_empty());
}

#[test]
fn connection_loss_only_matters_with_network() {
    let t0 = Instant::now();
    assert!(solo(t0).connection_lost().is_empty());

    let mut s = paired_joiner(t0);
    let fx = s.connection_lost();
    assert!(has(&fx, &Effect::Notify("Connection to relay lost".into())));
    assert_eq!(s.phase(), &Phase::Disconnected);
}

#[test]
fn restart_only_from_disconnected() {
    let t0 = Instant::now();
    let mut s = solo(t0);
    assert_eq!(s.restart(), Err(SessionError::AlreadyStarted));

    s.end_session();
    let fx = s.restart().unwrap();
    assert!(has(&fx, &Effect::ResetView));
    assert_eq!(s.phase(), &Phase::Idle);
    assert_eq!(s.elapsed(t0), None);
    assert!(s.create_room().is_ok());
}

#[test]
fn volume_is_clamped_and_applied_while_playing() {
    let t0 = Instant::now();
    let mut idle = FocusSession::new(settings());
    assert!(idle.set_ambient_volume(0.5).is_empty());
    assert_eq!(idle.ambient_volume(), 0.5);

    let mut s = solo(t0);
    assert_eq!(s.set_ambient_volume(3.0), vec![Effect::SetAmbientVolume(1.0)]);
    assert_eq!(s.set_ambient_volume(-1.0), vec![Effect::SetAmbientVolume(0.0)]);
    assert!(s.set_ambient_volume(f32::NAN).is_empty());
    assert_eq!(s.ambient_volume(), 0.0);
}

#[test]
fn settings_follow_config() {
    let config = focuspair_config::SessionConfig {
        break_threshold_secs: 60,
        break_duration_secs: 30,
        ambient_volume: 2.0,
        ..Default::default()
    };
    let settings = SessionSettings::from(&config);
    assert_eq!(settings.break_threshold, MIN);
    assert_eq!(settings.break_duration, Duration::from_secs(30));
    assert_eq!(settings.ambient_volume, 1.0);
}
