//! Environment variable overrides.

use focuspair_common::ConfigError;

use crate::schema::FocusPairConfig;

/// Variable selecting the relay's listen port.
pub const PORT_VAR: &str = "PORT";

/// Apply overrides from the process environment.
pub fn apply_env(config: &mut FocusPairConfig) -> Result<(), ConfigError> {
    apply_env_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides using `lookup` to read variables.
pub fn apply_env_from<F>(config: &mut FocusPairConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(PORT_VAR) {
        let raw = raw.trim();
        if !raw.is_empty() {
            config.server.port = raw.parse().map_err(|e| {
                ConfigError::ValidationError(format!("{PORT_VAR}={raw:?} is not a valid port: {e}"))
            })?;
        }
    }
    Ok(())
}
