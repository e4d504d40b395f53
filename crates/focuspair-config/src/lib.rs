//! FocusPair configuration.
//!
//! TOML-based configuration shared by the relay and the terminal client.
//! Every section uses serde defaults, so an empty or partial file works.
//! Environment overrides are applied on top of the file, and command-line
//! flags (handled by the binaries) on top of that.

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_path, load_or_default, DEFAULT_CONFIG_FILE};
pub use schema::{ClientConfig, FocusPairConfig, ServerConfig, SessionConfig};

use std::path::Path;

use focuspair_common::ConfigError;

/// Load, apply environment overrides, and validate.
///
/// With `path == None` the default file in the working directory is used if it
/// exists; otherwise built-in defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<FocusPairConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_from_path(path)?,
        None => load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    env::apply_env(&mut config)?;
    validation::validate(&config)?;
    Ok(config)
}
