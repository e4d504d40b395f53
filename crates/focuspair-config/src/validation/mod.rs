//! Configuration validation.
//!
//! Each section has its own check; errors are collected into a single
//! `ConfigError`.

mod helpers;


use focuspair_common::ConfigError;

use crate::schema::FocusPairConfig;
use helpers::{validate_at_most, validate_nonzero, validate_range_f32};

/// Upper bound for session periods: one day.
pub const MAX_SESSION_PERIOD_SECS: u64 = 24 * 60 * 60;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &FocusPairConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_server(&mut errors, config);
    validate_session(&mut errors, config);
    validate_client(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_server(errors: &mut Vec<String>, config: &FocusPairConfig) {
    let server = &config.server;
    if server.bind.trim().is_empty() {
        errors.push("server.bind must not be empty".into());
    }
    validate_nonzero(errors, "server.channel_capacity", server.channel_capacity as u64);
}

fn validate_session(errors: &mut Vec<String>, config: &FocusPairConfig) {
    let session = &config.session;
    validate_nonzero(errors, "session.break_duration_secs", session.break_duration_secs);
    validate_at_most(
        errors,
        "session.break_duration_secs",
        session.break_duration_secs,
        MAX_SESSION_PERIOD_SECS,
    );
    validate_at_most(
        errors,
        "session.break_threshold_secs",
        session.break_threshold_secs,
        MAX_SESSION_PERIOD_SECS,
    );
    validate_range_f32(errors, "session.ambient_volume", session.ambient_volume, 0.0, 1.0);
}

fn validate_client(errors: &mut Vec<String>, config: &FocusPairConfig) {
    let client = &config.client;
    if !(client.server_url.starts_with("ws://") || client.server_url.starts_with("wss://")) {
        errors.push(format!(
            "client.server_url = {:?} must start with ws:// or wss://",
            client.server_url
        ));
    }
    validate_nonzero(errors, "client.connect_timeout_secs", client.connect_timeout_secs);
}
