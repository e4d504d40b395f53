//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod client;
mod server;
mod session;

pub use client::*;
pub use server::*;
pub use session::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusPairConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub client: ClientConfig,
}
