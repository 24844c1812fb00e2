//! Configuration merging and precedence handling.

use crate::config::schema::{BookingConfig, Config, DatabaseSettings, MailConfig, SessionConfig};

/// Merges configuration layers, later layers winning.
///
/// # Examples
///
/// ```
/// use innkeep::config::{Config, ConfigMerger};
///
/// let low = Config { rooms: Some(vec!["A".into()]), ..Default::default() };
/// let high = Config { rooms: Some(vec!["B".into()]), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.room_names(), vec!["B"]);
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge source config into target (source overwrites target).
    ///
    /// # Merging Rules
    ///
    /// - Simple fields: source overwrites if Some
    /// - Room list: complete replacement
    /// - Nested configs: field-by-field merge
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.rooms.is_some() {
            target.rooms.clone_from(&source.rooms);
        }

        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if let Some(ref s) = source.database {
            let t = target.database.get_or_insert_with(DatabaseSettings::default);
            if s.query_timeout_ms.is_some() {
                t.query_timeout_ms = s.query_timeout_ms;
            }
            if s.busy_timeout_ms.is_some() {
                t.busy_timeout_ms = s.busy_timeout_ms;
            }
        }

        if let Some(ref s) = source.booking {
            let t = target.booking.get_or_insert_with(BookingConfig::default);
            if s.commit_policy.is_some() {
                t.commit_policy = s.commit_policy;
            }
            if s.recheck_availability.is_some() {
                t.recheck_availability = s.recheck_availability;
            }
        }

        if let Some(ref s) = source.session {
            let t = target.session.get_or_insert_with(SessionConfig::default);
            if s.lifetime_hours.is_some() {
                t.lifetime_hours = s.lifetime_hours;
            }
        }

        if let Some(ref s) = source.mail {
            let t = target.mail.get_or_insert_with(MailConfig::default);
            if s.from.is_some() {
                t.from.clone_from(&s.from);
            }
            if s.queue_capacity.is_some() {
                t.queue_capacity = s.queue_capacity;
            }
            if s.outbox_dir.is_some() {
                t.outbox_dir.clone_from(&s.outbox_dir);
            }
        }
    }
}
