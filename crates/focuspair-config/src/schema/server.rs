use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Relay server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind on.
    pub bind: String,
    pub port: u16,
    /// Directory holding the browser bundle.
    pub public_dir: PathBuf,
    /// Directory served under `/assets`.
    pub assets_dir: PathBuf,
    /// Outbound queue depth per connection.
    pub channel_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 3000,
            public_dir: PathBuf::from("public"),
            assets_dir: PathBuf::from("assets"),
            channel_capacity: 64,
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
