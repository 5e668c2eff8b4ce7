// src/config.rs

//! Settings loading utilities.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables. The binary loads a `.env` file into the process
//! environment before calling [`load_settings`].

use std::path::Path;
use std::str::FromStr;

use crate::error::{AppError, Result};
use crate::models::Settings;

/// Load settings from `path` (missing file means defaults) and apply
/// environment overrides.
///
/// The result is not validated: callers install logging first so that
/// [`Settings::validate`] warnings reach a subscriber.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let mut settings = Settings::load_or_default(path)?;
    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env<F>(settings: &mut Settings, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let set = |target: &mut String, key: &str| {
        if let Some(value) = lookup(key) {
            *target = value;
        }
    };

    set(&mut settings.server.host, "HOST");
    set(&mut settings.auth.username, "CRON_USERNAME");
    set(&mut settings.auth.password, "CRON_PASSWORD");
    set(&mut settings.email.api_key, "RESEND_API_KEY");
    set(&mut settings.email.api_base, "RESEND_API_BASE");
    set(&mut settings.email.from, "FROM_EMAIL");
    set(&mut settings.email.subject, "EMAIL_SUBJECT");
    set(&mut settings.leetcode.base_url, "LEETCODE_API_BASE");
    set(&mut settings.storage.users_file, "USERS_FILE");
    set(&mut settings.logging.level, "LOG_LEVEL");
    set(&mut settings.logging.file, "LOG_FILE");
    set(&mut settings.logging.runs_file, "RUNS_LOG_FILE");

    if let Some(port) = parse_var(&lookup, "PORT")? {
        settings.server.port = port;
    }
    if let Some(timeout) = parse_var(&lookup, "LEETCODE_TIMEOUT_SECS")? {
        settings.leetcode.timeout_secs = timeout;
    }
    if let Some(timeout) = parse_var(&lookup, "EMAIL_TIMEOUT_SECS")? {
        settings.email.timeout_secs = timeout;
    }
    if let Some(json) = parse_var(&lookup, "LOG_JSON")? {
        settings.logging.json = json;
    }

    Ok(())
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}")))
        })
        .transpose()
}
