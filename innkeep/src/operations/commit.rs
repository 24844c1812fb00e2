//! Booking commit: persist a completed draft and confirm it.
//!
//! The commit policy decides how the reservation row and its room
//! restriction are written:
//!
//! - [`CommitPolicy::Transactional`] writes both in one transaction and, by
//!   default, re-checks availability inside it. Either both rows exist or
//!   neither does.
//! - [`CommitPolicy::Sequential`] writes them one after the other. A failed
//!   second write leaves an orphaned reservation and is reported as
//!   `Error::PartialCommit`.
//!
//! The confirmation mail is enqueued only after the writes succeed, and
//! enqueueing never blocks.

use crate::config::{CommitPolicy, Config};
use crate::database::Database;
use crate::draft::Draft;
use crate::error::Result;
use crate::mail::{confirmation_message, MailQueue, DEFAULT_SENDER};
use crate::reservation::Reservation;

/// A booking that made it to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedBooking {
    /// The stored reservation.
    pub reservation: Reservation,
    /// The draft, advanced to `Committed`.
    pub draft: Draft,
}

/// Writes completed drafts to storage.
///
/// # Examples
///
/// ```no_run
/// use innkeep::config::CommitPolicy;
/// use innkeep::database::{Database, DatabaseConfig};
/// use innkeep::draft::Draft;
/// use innkeep::operations::BookingCommit;
///
/// let db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
/// let commit = BookingCommit::new(&db).with_policy(CommitPolicy::Transactional);
///
/// # let draft = Draft::Empty;
/// let booking = commit.commit(&draft).unwrap();
/// println!("reservation {}", booking.reservation.id());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BookingCommit<'a> {
    db: &'a Database,
    policy: CommitPolicy,
    recheck: bool,
    mail: Option<&'a MailQueue>,
    mail_from: &'a str,
}

impl<'a> BookingCommit<'a> {
    /// Creates a transactional commit with the availability re-check on and
    /// no mail queue.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self {
            db,
            policy: CommitPolicy::Transactional,
            recheck: true,
            mail: None,
            mail_from: DEFAULT_SENDER,
        }
    }

    /// Creates a commit configured from the `booking` and `mail` sections.
    #[must_use]
    pub fn from_config(db: &'a Database, config: &'a Config) -> Self {
        Self::new(db)
            .with_policy(config.commit_policy())
            .with_recheck(config.recheck_availability())
            .with_sender(config.mail_from())
    }

    /// Sets the commit policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: CommitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Turns the in-transaction availability re-check on or off.
    ///
    /// Only the transactional policy re-checks.
    #[must_use]
    pub const fn with_recheck(mut self, recheck: bool) -> Self {
        self.recheck = recheck;
        self
    }

    /// Sends confirmations through `queue`.
    #[must_use]
    pub const fn with_mail(mut self, queue: &'a MailQueue) -> Self {
        self.mail = Some(queue);
        self
    }

    /// Sets the confirmation sender address.
    #[must_use]
    pub const fn with_sender(mut self, from: &'a str) -> Self {
        self.mail_from = from;
        self
    }

    /// Returns the commit policy.
    #[must_use]
    pub const fn policy(&self) -> CommitPolicy {
        self.policy
    }

    /// Persists a `DetailsPending` draft.
    ///
    /// On success the confirmation is enqueued and the returned draft is
    /// `Committed`. On failure nothing about the draft changes; the caller
    /// keeps its stored copy.
    ///
    /// # Errors
    ///
    /// - `Error::MissingDraft` / `Error::DraftState` if the draft is not
    ///   ready to commit
    /// - `Error::RoomUnavailable` if the re-check finds a conflict
    /// - `Error::PartialCommit` if the sequential policy wrote only the
    ///   reservation
    /// - `Error::Database` / `Error::StorageTimeout` otherwise
    pub fn commit(&self, draft: &Draft) -> Result<CommittedBooking> {
        let booking = draft.to_new_reservation()?;
        let room_name = draft.room().map(|room| room.name.clone()).unwrap_or_default();

        let reservation_id = match self.policy {
            CommitPolicy::Transactional => self.db.with_deadline(|conn| {
                Database::commit_booking(conn, &booking, self.recheck)
            })?,
            CommitPolicy::Sequential => self
                .db
                .with_deadline(|conn| Database::commit_booking_sequential(conn, &booking))?,
        };

        let reservation =
            Reservation::builder(reservation_id, booking.room_id, booking.stay, booking.guest)
                .room_name(room_name)
                .build();

        if let Some(queue) = self.mail {
            queue.enqueue(confirmation_message(&reservation, self.mail_from));
        }

        let draft = draft.mark_committed(reservation_id)?;
        Ok(CommittedBooking { reservation, draft })
    }
}
