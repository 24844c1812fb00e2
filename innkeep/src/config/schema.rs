//! Configuration schema definitions.
//!
//! Every field is optional so that partial files and environment overrides
//! can be layered; the accessor methods on [`Config`] fill in the built-in
//! defaults.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::mail::{DEFAULT_QUEUE_CAPACITY, DEFAULT_SENDER};
use crate::session::DEFAULT_SESSION_LIFETIME;

/// Default per-call storage deadline in milliseconds.
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 3000;

/// Default SQLite busy timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 3000;

/// Rooms seeded by `init` when the configuration lists none.
pub const DEFAULT_ROOMS: &[&str] = &["General's Quarters", "Major's Suite"];

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use innkeep::config::{BookingConfig, CommitPolicy, Config};
///
/// let config = Config {
///     booking: Some(BookingConfig {
///         commit_policy: Some(CommitPolicy::Sequential),
///         recheck_availability: None,
///     }),
///     ..Default::default()
/// };
/// assert_eq!(config.commit_policy(), CommitPolicy::Sequential);
/// assert!(config.recheck_availability());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Room names seeded into the catalog by `init`.
    pub rooms: Option<Vec<String>>,

    /// Storage limits.
    pub database: Option<DatabaseSettings>,

    /// Booking commit behavior.
    pub booking: Option<BookingConfig>,

    /// Session settings.
    pub session: Option<SessionConfig>,

    /// Confirmation mail settings.
    pub mail: Option<MailConfig>,

    /// Disable automatic database initialization.
    pub disable_autoinit: Option<bool>,
}

/// Storage limits.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSettings {
    /// Deadline for a single storage call, in milliseconds.
    pub query_timeout_ms: Option<u64>,

    /// How long to wait for a locked database, in milliseconds.
    pub busy_timeout_ms: Option<u64>,
}

/// Booking commit behavior.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    /// How the reservation and restriction writes are grouped.
    pub commit_policy: Option<CommitPolicy>,

    /// Re-check availability inside the commit transaction.
    pub recheck_availability: Option<bool>,
}

/// Session settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Hours before a session expires.
    pub lifetime_hours: Option<u64>,
}

/// Confirmation mail settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    /// Sender address on confirmations.
    pub from: Option<String>,

    /// Messages held before the queue starts dropping.
    pub queue_capacity: Option<usize>,

    /// Write messages as JSON files here instead of logging them.
    pub outbox_dir: Option<PathBuf>,
}

/// How the booking commit groups its two writes.
///
/// # Examples
///
/// ```
/// use innkeep::config::CommitPolicy;
///
/// let policy: CommitPolicy = "sequential".parse().unwrap();
/// assert_eq!(policy, CommitPolicy::Sequential);
/// assert_eq!(CommitPolicy::default().to_string(), "transactional");
/// ```
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommitPolicy {
    /// Both writes in one `IMMEDIATE` transaction; all or nothing.
    #[default]
    Transactional,
    /// Two independent writes; a failed second write leaves the first.
    Sequential,
}

impl fmt::Display for CommitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transactional => write!(f, "transactional"),
            Self::Sequential => write!(f, "sequential"),
        }
    }
}

impl FromStr for CommitPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transactional" => Ok(Self::Transactional),
            "sequential" => Ok(Self::Sequential),
            _ => Err(Error::Validation {
                field: "commit_policy".into(),
                message: format!("unknown commit policy '{s}' (expected transactional or sequential)"),
            }),
        }
    }
}

impl Config {
    /// Returns the rooms to seed, falling back to the built-in list.
    #[must_use]
    pub fn room_names(&self) -> Vec<String> {
        self.rooms.clone().unwrap_or_else(|| {
            DEFAULT_ROOMS.iter().map(|name| (*name).to_string()).collect()
        })
    }

    /// Returns the per-call storage deadline.
    #[must_use]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(
            self.database
                .as_ref()
                .and_then(|d| d.query_timeout_ms)
                .unwrap_or(DEFAULT_QUERY_TIMEOUT_MS),
        )
    }

    /// Returns the lock wait limit.
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(
            self.database
                .as_ref()
                .and_then(|d| d.busy_timeout_ms)
                .unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
        )
    }

    /// Returns the commit policy.
    #[must_use]
    pub fn commit_policy(&self) -> CommitPolicy {
        self.booking
            .as_ref()
            .and_then(|b| b.commit_policy)
            .unwrap_or_default()
    }

    /// Returns whether commits re-check availability.
    #[must_use]
    pub fn recheck_availability(&self) -> bool {
        self.booking
            .as_ref()
            .and_then(|b| b.recheck_availability)
            .unwrap_or(true)
    }

    /// Returns the session lifetime.
    #[must_use]
    pub fn session_lifetime(&self) -> Duration {
        self.session
            .as_ref()
            .and_then(|s| s.lifetime_hours)
            .map_or(DEFAULT_SESSION_LIFETIME, |hours| {
                Duration::from_secs(hours.saturating_mul(60 * 60))
            })
    }

    /// Returns the confirmation sender address.
    #[must_use]
    pub fn mail_from(&self) -> &str {
        self.mail
            .as_ref()
            .and_then(|m| m.from.as_deref())
            .unwrap_or(DEFAULT_SENDER)
    }

    /// Returns the mail queue capacity.
    #[must_use]
    pub fn mail_queue_capacity(&self) -> usize {
        self.mail
            .as_ref()
            .and_then(|m| m.queue_capacity)
            .unwrap_or(DEFAULT_QUEUE_CAPACITY)
    }

    /// Returns the outbox directory, if mail should be written to files.
    #[must_use]
    pub fn mail_outbox_dir(&self) -> Option<&PathBuf> {
        self.mail.as_ref().and_then(|m| m.outbox_dir.as_ref())
    }

    /// Returns whether automatic database initialization is disabled.
    #[must_use]
    pub fn autoinit_disabled(&self) -> bool {
        self.disable_autoinit.unwrap_or(false)
    }
}
