//! Presentation of session effects.
//!
//! The terminal presenter stands in for the browser: status lines replace the
//! page text, the terminal bell is the alarm, and the clock is printed as it
//! ticks.

use std::io::Write;

use crate::clock::format_elapsed;
use crate::session::Effect;

/// Applies presentation effects. Network and timer effects never reach it.
pub trait Presenter {
    fn apply(&mut self, effect: &Effect) -> std::io::Result<()>;

    /// Free-form text outside the session flow, such as help.
    fn info(&mut self, text: &str) -> std::io::Result<()>;
}

/// Line-oriented presenter writing to any `Write`.
pub struct TerminalPresenter<W: Write> {
    out: W,
    alarm_ringing: bool,
    ambient: Option<f32>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            alarm_ringing: false,
            ambient: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn ring(&mut self) -> std::io::Result<()> {
        write!(self.out, "\x07")
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn apply(&mut self, effect: &Effect) -> std::io::Result<()> {
        match effect {
            Effect::Status { text, alert } => {
                let marker = if *alert { "!!" } else { "--" };
                writeln!(self.out, "{marker} {text}")?;
            }
            Effect::ShowRoomCode(code) => writeln!(self.out, "Your Room Code: {code}")?,
            Effect::SetPairingInput { enabled: true } => {
                writeln!(self.out, "Commands: create | join <code> | solo")?;
            }
            Effect::ShowFocusView => {
                writeln!(self.out, "Commands: away | back | break | volume <0-100> | end")?;
            }
            Effect::PlayAlarm => {
                self.alarm_ringing = true;
                self.ring()?;
            }
            Effect::StopAlarm => self.alarm_ringing = false,
            Effect::PlayAmbient { volume } => {
                if self.ambient.is_none() {
                    writeln!(self.out, "~ ambient music on ({:.0}%)", volume * 100.0)?;
                }
                self.ambient = Some(*volume);
            }
            Effect::StopAmbient => {
                if self.ambient.take().is_some() {
                    writeln!(self.out, "~ ambient music off")?;
                }
            }
            Effect::SetAmbientVolume(volume) => {
                self.ambient = Some(*volume);
                writeln!(self.out, "~ volume {:.0}%", volume * 100.0)?;
            }
            Effect::SetAlert(on) => {
                if *on {
                    writeln!(self.out, "[ALERT]")?;
                }
            }
            Effect::Elapsed(elapsed) => {
                // The alarm loops for as long as it rings.
                if self.alarm_ringing {
                    self.ring()?;
                }
                write!(self.out, "\r{} ", format_elapsed(*elapsed))?;
            }
            Effect::Notify(text) => writeln!(self.out, "\n*** {text} ***")?,
            Effect::ResetView => {
                self.alarm_ringing = false;
                self.ambient = None;
                writeln!(self.out)?;
            }
            Effect::SetPairingInput { enabled: false }
            | Effect::Send(_)
            | Effect::Disconnect
            | Effect::StartTimer(_)
            | Effect::CancelTimer(_) => {}
        }
        self.out.flush()
    }

    fn info(&mut self, text: &str) -> std::io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }
}
