//! TOML config file loading.

use std::path::Path;

use focuspair_common::ConfigError;
use tracing::info;

use crate::schema::FocusPairConfig;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "focuspair.toml";

/// Load config from a specific TOML file path.
///
/// Missing fields fall back to serde defaults.
pub fn load_from_path(path: &Path) -> Result<FocusPairConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config = parse(&content)?;
    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from `path`, or return defaults when the file does not exist.
pub fn load_or_default(path: &Path) -> Result<FocusPairConfig, ConfigError> {
    match load_from_path(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config at {}, using defaults", path.display());
            Ok(FocusPairConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Parse a config from TOML text.
pub fn parse(content: &str) -> Result<FocusPairConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))
}
