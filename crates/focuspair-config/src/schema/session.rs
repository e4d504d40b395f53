use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Focus session behaviour shared by the browser bundle and terminal client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Time that must pass before a break may be taken.
    pub break_threshold_secs: u64,
    /// Length of a break.
    pub break_duration_secs: u64,
    /// Ambient music volume, 0.0 to 1.0.
    pub ambient_volume: f32,
    /// Alarm file under the assets directory.
    pub alarm_sound: String,
    /// Ambient file under the assets directory.
    pub ambient_sound: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            break_threshold_secs: 30 * 60,
            break_duration_secs: 10 * 60,
            ambient_volume: 0.2,
            alarm_sound: "boom.mp3".into(),
            ambient_sound: "theme.webm".into(),
        }
    }
}

impl SessionConfig {
    pub fn break_threshold(&self) -> Duration {
        Duration::from_secs(self.break_threshold_secs)
    }

    pub fn break_duration(&self) -> Duration {
        Duration::from_secs(self.break_duration_secs)
    }
}
