//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `INNKEEP_*` environment variables that
//! override configuration file values.

use crate::config::schema::{
    BookingConfig, CommitPolicy, Config, DatabaseSettings, MailConfig, SessionConfig,
};
use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use innkeep::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// Recognized variables:
    /// - `INNKEEP_ROOMS` (comma-separated room names)
    /// - `INNKEEP_QUERY_TIMEOUT_MS`, `INNKEEP_BUSY_TIMEOUT_MS`
    /// - `INNKEEP_COMMIT_POLICY`, `INNKEEP_RECHECK_AVAILABILITY`
    /// - `INNKEEP_SESSION_LIFETIME_HOURS`
    /// - `INNKEEP_MAIL_FROM`, `INNKEEP_MAIL_QUEUE_CAPACITY`, `INNKEEP_MAIL_OUTBOX_DIR`
    /// - `INNKEEP_DISABLE_AUTOINIT`
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable value is invalid
    /// (e.g., non-numeric timeout, invalid boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(rooms) = env::var("INNKEEP_ROOMS") {
            config.rooms = Some(Self::parse_room_list(&rooms));
        }

        if let Ok(val) = env::var("INNKEEP_DISABLE_AUTOINIT") {
            config.disable_autoinit = Some(Self::parse_bool("INNKEEP_DISABLE_AUTOINIT", &val)?);
        }

        if let Ok(val) = env::var("INNKEEP_QUERY_TIMEOUT_MS") {
            config
                .database
                .get_or_insert_with(DatabaseSettings::default)
                .query_timeout_ms = Some(Self::parse_number("INNKEEP_QUERY_TIMEOUT_MS", &val)?);
        }

        if let Ok(val) = env::var("INNKEEP_BUSY_TIMEOUT_MS") {
            config
                .database
                .get_or_insert_with(DatabaseSettings::default)
                .busy_timeout_ms = Some(Self::parse_number("INNKEEP_BUSY_TIMEOUT_MS", &val)?);
        }

        Self::apply_booking_overrides(config)?;

        if let Ok(val) = env::var("INNKEEP_SESSION_LIFETIME_HOURS") {
            config
                .session
                .get_or_insert_with(SessionConfig::default)
                .lifetime_hours = Some(Self::parse_number("INNKEEP_SESSION_LIFETIME_HOURS", &val)?);
        }

        Self::apply_mail_overrides(config)
    }

    fn apply_booking_overrides(config: &mut Config) -> Result<()> {
        if let Ok(val) = env::var("INNKEEP_COMMIT_POLICY") {
            let policy = CommitPolicy::from_str(&val).map_err(|_| Error::Validation {
                field: "INNKEEP_COMMIT_POLICY".into(),
                message: format!("Invalid commit policy: '{val}' (expected transactional or sequential)"),
            })?;
            config
                .booking
                .get_or_insert_with(BookingConfig::default)
                .commit_policy = Some(policy);
        }

        if let Ok(val) = env::var("INNKEEP_RECHECK_AVAILABILITY") {
            config
                .booking
                .get_or_insert_with(BookingConfig::default)
                .recheck_availability = Some(Self::parse_bool("INNKEEP_RECHECK_AVAILABILITY", &val)?);
        }

        Ok(())
    }

    fn apply_mail_overrides(config: &mut Config) -> Result<()> {
        if let Ok(from) = env::var("INNKEEP_MAIL_FROM") {
            config.mail.get_or_insert_with(MailConfig::default).from = Some(from);
        }

        if let Ok(val) = env::var("INNKEEP_MAIL_QUEUE_CAPACITY") {
            config
                .mail
                .get_or_insert_with(MailConfig::default)
                .queue_capacity = Some(Self::parse_number("INNKEEP_MAIL_QUEUE_CAPACITY", &val)?);
        }

        if let Ok(dir) = env::var("INNKEEP_MAIL_OUTBOX_DIR") {
            config.mail.get_or_insert_with(MailConfig::default).outbox_dir = Some(PathBuf::from(dir));
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_number<T: FromStr>(field: &str, s: &str) -> Result<T> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("Must be a non-negative integer, got '{s}'"),
        })
    }

    /// Splits a comma-separated room list, dropping empty entries.
    fn parse_room_list(s: &str) -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}
