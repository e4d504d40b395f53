//! Terminal driver: feeds user input, relay events and timer ticks into a
//! [`FocusSession`] and carries out the effects it returns.

use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use focuspair_common::{ClientError, ServerMessage};
use focuspair_config::FocusPairConfig;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::command::{parse_command, Command, HELP};
use crate::connection::RelayConnection;
use crate::presenter::Presenter;
use crate::session::{Effect, FocusSession, SessionError, SessionSettings, TimerKind};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

enum Event {
    Input(Option<String>),
    Relay(Option<ServerMessage>),
    Tick,
}

/// Interactive focus session bound to one presenter.
pub struct App<P: Presenter> {
    session: FocusSession,
    presenter: P,
    connection: Option<RelayConnection>,
    server_url: String,
    connect_timeout: Duration,
    timers: HashSet<TimerKind>,
    ticker: Interval,
}

impl<P: Presenter> App<P> {
    pub fn new(config: &FocusPairConfig, presenter: P) -> Self {
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            session: FocusSession::new(SessionSettings::from(&config.session)),
            presenter,
            connection: None,
            server_url: config.client.server_url.clone(),
            connect_timeout: config.client.connect_timeout(),
            timers: HashSet::new(),
            ticker,
        }
    }

    pub fn session(&self) -> &FocusSession {
        &self.session
    }

    /// Run until `quit` or end of input. `first` is executed before any
    /// input is read.
    pub async fn run<R>(mut self, input: R, first: Option<Command>) -> Result<(), ClientError>
    where
        R: AsyncBufRead + Unpin,
    {
        self.show_info("Type `help` for commands.");
        self.apply(vec![
            Effect::SetPairingInput { enabled: true },
            Effect::Status {
                text: "Create or join a room.".into(),
                alert: false,
            },
        ])
        .await;

        if let Some(command) = first {
            if !self.execute(command).await {
                return Ok(());
            }
        }

        let mut lines = input.lines();
        loop {
            let event = tokio::select! {
                line = lines.next_line() => Event::Input(line?),
                message = next_message(self.connection.as_mut()) => Event::Relay(message),
                _ = self.ticker.tick(), if !self.timers.is_empty() => Event::Tick,
            };

            match event {
                Event::Input(None) => {
                    self.quit().await;
                    return Ok(());
                }
                Event::Input(Some(line)) => match parse_command(&line) {
                    Ok(Some(command)) => {
                        if !self.execute(command).await {
                            return Ok(());
                        }
                    }
                    Ok(None) => {}
                    Err(e) => self.show_info(&e),
                },
                Event::Relay(Some(message)) => {
                    debug!(?message, "Relay event");
                    let effects = self.session.on_server(message, Instant::now());
                    self.apply(effects).await;
                }
                Event::Relay(None) => {
                    self.connection = None;
                    let effects = self.session.connection_lost();
                    self.apply(effects).await;
                }
                Event::Tick => {
                    let effects = self.session.tick(Instant::now());
                    self.apply(effects).await;
                }
            }
        }
    }

    /// Carry out one command. Returns `false` when the app should exit.
    async fn execute(&mut self, command: Command) -> bool {
        let now = Instant::now();
        let result = match command {
            Command::Create => match self.ensure_connected().await {
                Ok(()) => self.session.create_room(),
                Err(e) => Ok(vec![Effect::Notify(e.to_string())]),
            },
            Command::Join(code) => match self.ensure_connected().await {
                Ok(()) => self.session.join_room(&code),
                Err(e) => Ok(vec![Effect::Notify(e.to_string())]),
            },
            Command::Solo => self.session.start_solo(now),
            Command::Away => Ok(self.session.visibility_changed(false)),
            Command::Back => Ok(self.session.visibility_changed(true)),
            Command::Break => self.session.start_break(now),
            Command::End => Ok(self.session.end_session()),
            Command::Restart => self.session.restart(),
            Command::Volume(volume) => Ok(self.session.set_ambient_volume(volume)),
            Command::Help => {
                self.show_info(HELP);
                Ok(Vec::new())
            }
            Command::Quit => {
                self.quit().await;
                return false;
            }
        };

        match result {
            Ok(effects) => self.apply(effects).await,
            Err(e) => self.show_session_error(e),
        }
        true
    }

    async fn ensure_connected(&mut self) -> Result<(), ClientError> {
        if self.connection.is_none() {
            let connection = RelayConnection::connect(&self.server_url, self.connect_timeout).await?;
            self.connection = Some(connection);
        }
        Ok(())
    }

    async fn quit(&mut self) {
        let effects = self.session.end_session();
        self.apply(effects).await;
        if let Some(connection) = self.connection.take() {
            connection.close().await;
        }
    }

    /// Apply effects in order. Network and timer effects are handled here;
    /// the rest go to the presenter.
    async fn apply(&mut self, effects: Vec<Effect>) {
        let mut queue = VecDeque::from(effects);

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Send(message) => {
                    let Some(connection) = self.connection.as_mut() else {
                        warn!(?message, "Not connected; dropping message");
                        continue;
                    };
                    if let Err(e) = connection.send(&message).await {
                        warn!(error = %e, "Send to relay failed");
                        self.connection = None;
                        queue.extend(self.session.connection_lost());
                    }
                }
                Effect::Disconnect => {
                    if let Some(connection) = self.connection.take() {
                        connection.close().await;
                    }
                }
                Effect::StartTimer(kind) => {
                    if self.timers.is_empty() {
                        self.ticker.reset();
                    }
                    self.timers.insert(kind);
                }
                Effect::CancelTimer(kind) => {
                    self.timers.remove(&kind);
                }
                other => {
                    if let Err(e) = self.presenter.apply(&other) {
                        warn!(error = %e, effect = ?other, "Failed to present effect");
                    }
                }
            }
        }
    }

    fn show_session_error(&mut self, error: SessionError) {
        self.show_info(&error.to_string());
    }

    fn show_info(&mut self, text: &str) {
        if let Err(e) = self.presenter.info(text) {
            warn!(error = %e, "Failed to write output");
        }
    }
}

/// Next relay message, or never when there is no connection.
async fn next_message(connection: Option<&mut RelayConnection>) -> Option<ServerMessage> {
    match connection {
        Some(connection) => connection.recv().await,
        None => std::future::pending().await,
    }
}
