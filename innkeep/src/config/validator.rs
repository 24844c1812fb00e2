//! Configuration validation.
//!
//! This module checks that configured values are usable before anything is
//! opened or started with them.

use crate::config::schema::{Config, DatabaseSettings, MailConfig, SessionConfig};
use crate::error::{Error, Result};
use crate::validation::is_email;
use std::collections::HashSet;

/// Longest accepted room name.
pub const MAX_ROOM_NAME_LEN: usize = 255;

/// Largest accepted mail queue capacity.
pub const MAX_QUEUE_CAPACITY: usize = 10_000;

/// Validates a configuration.
///
/// # Examples
///
/// ```
/// use innkeep::config::{Config, ConfigValidator};
///
/// let config = Config::default();
/// ConfigValidator::validate(&config).unwrap();
///
/// let bad = Config { rooms: Some(vec!["  ".into()]), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref rooms) = config.rooms {
            Self::validate_rooms(rooms)?;
        }

        if let Some(ref database) = config.database {
            Self::validate_database(database)?;
        }

        if let Some(ref session) = config.session {
            Self::validate_session(session)?;
        }

        if let Some(ref mail) = config.mail {
            Self::validate_mail(mail)?;
        }

        Ok(())
    }

    /// Validate a room name.
    ///
    /// Checks that the name is non-empty after trimming, contains no
    /// null bytes, and is not longer than 255 characters.
    fn validate_room_name(field: &str, value: &str) -> Result<()> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(Error::Validation {
                field: field.into(),
                message: "Cannot be empty or only whitespace".into(),
            });
        }

        if trimmed.contains('\0') {
            return Err(Error::Validation {
                field: field.into(),
                message: "Cannot contain null bytes".into(),
            });
        }

        if trimmed.chars().count() > MAX_ROOM_NAME_LEN {
            return Err(Error::Validation {
                field: field.into(),
                message: format!("Cannot exceed {MAX_ROOM_NAME_LEN} characters"),
            });
        }

        Ok(())
    }

    fn validate_rooms(rooms: &[String]) -> Result<()> {
        let mut seen = HashSet::new();
        for (index, name) in rooms.iter().enumerate() {
            let field = format!("rooms[{index}]");
            Self::validate_room_name(&field, name)?;
            if !seen.insert(name.trim()) {
                return Err(Error::Validation {
                    field,
                    message: format!("Duplicate room name '{}'", name.trim()),
                });
            }
        }
        Ok(())
    }

    fn validate_database(database: &DatabaseSettings) -> Result<()> {
        if database.query_timeout_ms == Some(0) {
            return Err(Error::Validation {
                field: "database.query_timeout_ms".into(),
                message: "Timeout must be greater than 0".into(),
            });
        }

        if database.busy_timeout_ms == Some(0) {
            return Err(Error::Validation {
                field: "database.busy_timeout_ms".into(),
                message: "Timeout must be greater than 0".into(),
            });
        }

        Ok(())
    }

    fn validate_session(session: &SessionConfig) -> Result<()> {
        if session.lifetime_hours == Some(0) {
            return Err(Error::Validation {
                field: "session.lifetime_hours".into(),
                message: "Lifetime must be at least 1 hour".into(),
            });
        }
        Ok(())
    }

    fn validate_mail(mail: &MailConfig) -> Result<()> {
        if let Some(ref from) = mail.from {
            if !is_email(from.trim()) {
                return Err(Error::Validation {
                    field: "mail.from".into(),
                    message: format!("Invalid email address: '{from}'"),
                });
            }
        }

        if let Some(capacity) = mail.queue_capacity {
            if capacity == 0 || capacity > MAX_QUEUE_CAPACITY {
                return Err(Error::Validation {
                    field: "mail.queue_capacity".into(),
                    message: format!("Must be between 1 and {MAX_QUEUE_CAPACITY}"),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_config() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_room_name_empty() {
        assert!(ConfigValidator::validate_room_name("rooms[0]", "").is_err());
        assert!(ConfigValidator::validate_room_name("rooms[0]", "   ").is_err());
    }

    #[test]
    fn test_validate_room_name_null_byte() {
        assert!(ConfigValidator::validate_room_name("rooms[0]", "Attic\0").is_err());
    }

    #[test]
    fn test_validate_room_name_too_long() {
        let long_name = "a".repeat(256);
        assert!(ConfigValidator::validate_room_name("rooms[0]", &long_name).is_err());
        let max_name = "a".repeat(255);
        assert!(ConfigValidator::validate_room_name("rooms[0]", &max_name).is_ok());
    }

    #[test]
    fn test_validate_duplicate_rooms() {
        let config = Config {
            rooms: Some(vec!["Attic".into(), " Attic ".into()]),
            ..Default::default()
        };
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("rooms[1]"));
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn test_validate_zero_timeouts() {
        for settings in [
            DatabaseSettings {
                query_timeout_ms: Some(0),
                busy_timeout_ms: None,
            },
            DatabaseSettings {
                query_timeout_ms: None,
                busy_timeout_ms: Some(0),
            },
        ] {
            let config = Config {
                database: Some(settings),
                ..Default::default()
            };
            assert!(ConfigValidator::validate(&config).is_err());
        }
    }

    #[test]
    fn test_validate_zero_lifetime() {
        let config = Config {
            session: Some(SessionConfig {
                lifetime_hours: Some(0),
            }),
            ..Default::default()
        };
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_validate_mail_from() {
        let config = Config {
            mail: Some(MailConfig {
                from: Some("not-an-address".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("mail.from"));
    }

    #[test]
    fn test_validate_queue_capacity_bounds() {
        for (capacity, ok) in [(0, false), (1, true), (10_000, true), (10_001, false)] {
            let config = Config {
                mail: Some(MailConfig {
                    queue_capacity: Some(capacity),
                    ..Default::default()
                }),
                ..Default::default()
            };
            assert_eq!(ConfigValidator::validate(&config).is_ok(), ok, "{capacity}");
        }
    }
}
