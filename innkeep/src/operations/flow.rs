//! The visitor booking flow, one method per page.
//!
//! A [`BookingFlow`] binds a database, one session's draft, and the commit
//! settings. Each method loads the draft, advances it, and stores it back,
//! so consecutive calls (or consecutive processes sharing a persistent
//! session store) continue where the last one stopped.

use crate::database::Database;
use crate::draft::{Draft, RoomChoice};
use crate::error::{Error, Result};
use crate::reservation::GuestDetails;
use crate::room::RoomId;
use crate::session::{DraftSession, SessionStore, SessionToken};
use crate::stay::StayRange;
use crate::validation::{FormErrors, ReservationForm};

use super::commit::BookingCommit;
use super::search::{check_room_availability, AvailabilityResponse, SearchOutcome};

/// What the reservation form shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationView {
    /// The room being booked.
    pub room: RoomChoice,
    /// The booked nights.
    pub stay: StayRange,
    /// Prefilled form values.
    pub form: ReservationForm,
}

/// Data for the reservation summary page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationSummary {
    /// Identifier of the committed reservation.
    pub reservation_id: i64,
    /// The booked room.
    pub room: RoomChoice,
    /// The booked nights.
    pub stay: StayRange,
    /// Who is staying.
    pub guest: GuestDetails,
}

impl ReservationSummary {
    fn from_draft(draft: &Draft) -> Option<Self> {
        match draft {
            Draft::Committed {
                stay,
                room,
                guest,
                reservation_id,
            } => Some(Self {
                reservation_id: *reservation_id,
                room: room.clone(),
                stay: *stay,
                guest: guest.clone(),
            }),
            _ => None,
        }
    }
}

/// Result of submitting the reservation form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The booking is stored. Also returned, without writing again, when
    /// the draft was already committed.
    Committed(ReservationSummary),
    /// Some fields were rejected; nothing was stored and the draft is
    /// unchanged.
    Invalid {
        /// The submitted values, for re-rendering.
        form: ReservationForm,
        /// Per-field messages.
        errors: FormErrors,
    },
}

/// The booking flow of one session.
///
/// # Examples
///
/// ```no_run
/// use innkeep::database::{Database, DatabaseConfig, SqliteSessionStore};
/// use innkeep::operations::{BookingFlow, SubmitOutcome};
/// use innkeep::session::SessionToken;
/// use innkeep::validation::ReservationForm;
/// use innkeep::StayRange;
///
/// let db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
/// let store = SqliteSessionStore::new(db.connection());
/// let flow = BookingFlow::new(&db, &store, SessionToken::generate());
///
/// let stay = StayRange::parse("2024-06-01", "2024-06-05").unwrap();
/// let outcome = flow.search(stay).unwrap();
/// let room = &outcome.rooms()[0];
/// flow.choose_room(room.id).unwrap();
///
/// let form = ReservationForm::new("Alice", "Lee", "alice@example.com", "");
/// if let SubmitOutcome::Committed(summary) = flow.submit(&form).unwrap() {
///     println!("reservation {}", summary.reservation_id);
/// }
/// ```
#[derive(Debug)]
pub struct BookingFlow<'a, S> {
    db: &'a Database,
    session: DraftSession<S>,
    commit: BookingCommit<'a>,
}

impl<'a, S: SessionStore> BookingFlow<'a, S> {
    /// Creates a flow with the default commit settings.
    #[must_use]
    pub const fn new(db: &'a Database, store: S, token: SessionToken) -> Self {
        Self {
            db,
            session: DraftSession::new(store, token),
            commit: BookingCommit::new(db),
        }
    }

    /// Replaces the commit settings.
    #[must_use]
    pub fn with_commit(mut self, commit: BookingCommit<'a>) -> Self {
        self.commit = commit;
        self
    }

    /// Returns the session this flow works on.
    #[must_use]
    pub const fn session(&self) -> &DraftSession<S> {
        &self.session
    }

    /// Returns the stored draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub fn draft(&self) -> Result<Draft> {
        self.session.load()
    }

    /// Searches every room for `stay`.
    ///
    /// A non-empty result restarts the draft at `RangeSelected`, whatever
    /// state it was in. An empty result leaves the draft alone.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the search fails; that is never reported
    /// as "no availability".
    pub fn search(&self, stay: StayRange) -> Result<SearchOutcome> {
        let rooms = self
            .db
            .with_deadline(|conn| Database::search_all_rooms(conn, &stay))?;

        if rooms.is_empty() {
            log::info!("No availability for {stay}");
            return Ok(SearchOutcome::NoAvailability);
        }

        let draft = self.session.load()?.select_range(stay);
        self.session.save(&draft)?;
        Ok(SearchOutcome::Available(rooms))
    }

    /// Answers whether one room is free, without touching the draft.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown room, or a storage error.
    pub fn check_room(&self, stay: &StayRange, room_id: RoomId) -> Result<AvailabilityResponse> {
        check_room_availability(self.db, stay, room_id)
    }

    /// Picks a room from the last search.
    ///
    /// # Errors
    ///
    /// - `Error::MissingDraft` if no search result is stored
    /// - `Error::DraftState` if the draft is already committed
    /// - `Error::NotFound` for an unknown room
    pub fn choose_room(&self, room_id: RoomId) -> Result<Draft> {
        let draft = self.session.load()?;
        if draft.is_empty() {
            log::warn!("Choose room {room_id} without a reservation draft in session");
            return Err(Error::MissingDraft);
        }

        let room = self.resolve_room(room_id)?;
        let draft = draft.choose_room(room)?;
        self.session.save(&draft)?;
        Ok(draft)
    }

    /// Starts a booking directly from a room and dates ("book this room").
    ///
    /// Works from any draft state and replaces whatever was there.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown room, or a storage error.
    pub fn book_room(&self, room_id: RoomId, stay: StayRange) -> Result<Draft> {
        let room = self.resolve_room(room_id)?;
        let draft = self.session.load()?.book_room(stay, room);
        self.session.save(&draft)?;
        Ok(draft)
    }

    /// Returns what the reservation form shows.
    ///
    /// # Errors
    ///
    /// - `Error::MissingDraft` if no draft is stored
    /// - `Error::DraftState` if no room is chosen yet or the draft is
    ///   committed
    pub fn reservation_form(&self) -> Result<ReservationView> {
        let draft = self.session.load()?;
        match &draft {
            Draft::RoomSelected { stay, room } => Ok(ReservationView {
                room: room.clone(),
                stay: *stay,
                form: ReservationForm::default(),
            }),
            Draft::DetailsPending { stay, room, guest } => Ok(ReservationView {
                room: room.clone(),
                stay: *stay,
                form: ReservationForm::from_guest(guest),
            }),
            Draft::Empty => {
                log::warn!("Reservation form requested without a reservation draft in session");
                Err(Error::MissingDraft)
            }
            other => Err(Error::DraftState {
                expected: "room selected or details pending",
                found: other.state_name(),
            }),
        }
    }

    /// Validates the guest's details and commits the booking.
    ///
    /// Room and dates always come from the draft. A committed draft is
    /// returned as-is and never written twice.
    ///
    /// # Errors
    ///
    /// - `Error::MissingDraft` / `Error::DraftState` if no room is chosen
    /// - any commit error; the draft then stays `DetailsPending`
    ///
    /// Once the booking is stored this always returns `Committed`. If the
    /// committed draft cannot be saved, the pending draft is dropped instead.
    pub fn submit(&self, form: &ReservationForm) -> Result<SubmitOutcome> {
        let draft = self.session.load()?;
        if let Some(summary) = ReservationSummary::from_draft(&draft) {
            log::info!(
                "Reservation {} already committed; not writing again",
                summary.reservation_id
            );
            return Ok(SubmitOutcome::Committed(summary));
        }
        if draft.is_empty() {
            log::warn!("Reservation submitted without a reservation draft in session");
            return Err(Error::MissingDraft);
        }
        if draft.room().is_none() {
            return Err(Error::DraftState {
                expected: "room selected or details pending",
                found: draft.state_name(),
            });
        }

        let guest = match form.validate() {
            Ok(guest) => guest,
            Err(errors) => {
                log::debug!("Reservation form rejected: {errors}");
                return Ok(SubmitOutcome::Invalid {
                    form: form.clone(),
                    errors,
                });
            }
        };

        let pending = draft.merge_details(guest)?;
        self.session.save(&pending)?;

        let booking = self.commit.commit(&pending)?;
        // The booking is stored; a pending draft left behind must not commit again.
        if let Err(e) = self.session.save(&booking.draft) {
            log::error!(
                "Reservation {} committed but the draft could not be saved: {e}",
                booking.reservation.id()
            );
            if let Err(e) = self.session.clear() {
                log::error!("Pending draft could not be removed either: {e}");
            }
        }

        ReservationSummary::from_draft(&booking.draft)
            .map(SubmitOutcome::Committed)
            .ok_or(Error::DraftState {
                expected: "committed",
                found: booking.draft.state_name(),
            })
    }

    /// Returns the summary of the committed booking.
    ///
    /// # Errors
    ///
    /// - `Error::MissingDraft` if no draft is stored
    /// - `Error::DraftState` if the draft is not committed
    pub fn summary(&self) -> Result<ReservationSummary> {
        let draft = self.session.load()?;
        if draft.is_empty() {
            log::warn!("Summary requested without a reservation draft in session");
            return Err(Error::MissingDraft);
        }
        ReservationSummary::from_draft(&draft).ok_or(Error::DraftState {
            expected: "committed",
            found: draft.state_name(),
        })
    }

    fn resolve_room(&self, room_id: RoomId) -> Result<RoomChoice> {
        let room = self
            .db
            .with_deadline(|conn| Database::require_room(conn, room_id))?;
        Ok(RoomChoice::new(room.id, room.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommitPolicy;
    use crate::database::test_util::{create_test_database, fail_restriction_inserts};
    use crate::session::MemorySessionStore;

    fn stay(start: &str, end: &str) -> StayRange {
        StayRange::parse(start, end).unwrap()
    }

    fn alice() -> ReservationForm {
        ReservationForm::new("Alice", "Lee", "alice@example.com", "555-0100")
    }

    #[test]
    fn test_full_flow() {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Major's Suite").unwrap();
        let store = MemorySessionStore::default();
        let flow = BookingFlow::new(&db, &store, SessionToken::generate());

        let outcome = flow.search(stay("2024-06-01", "2024-06-05")).unwrap();
        assert_eq!(outcome.rooms().len(), 1);
        assert_eq!(flow.draft().unwrap().state_name(), "range selected");

        flow.choose_room(room.id).unwrap();
        let view = flow.reservation_form().unwrap();
        assert_eq!(view.room.name, "Major's Suite");
        assert_eq!(view.form, ReservationForm::default());

        let SubmitOutcome::Committed(summary) = flow.submit(&alice()).unwrap() else {
            panic!("expected commit");
        };
        assert_eq!(summary.room.id, room.id);
        assert_eq!(summary.guest.phone(), "555-0100");
        assert_eq!(flow.summary().unwrap(), summary);

        // Dates are now taken
        assert!(!flow.check_room(&summary.stay, room.id).unwrap().ok);
    }

    #[test]
    fn test_empty_search_keeps_draft() {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Room").unwrap();
        Database::insert_owner_block(db.connection(), room.id, &stay("2024-06-01", "2024-06-30"))
            .unwrap();
        let store = MemorySessionStore::default();
        let flow = BookingFlow::new(&db, &store, SessionToken::generate());

        flow.book_room(room.id, stay("2024-07-01", "2024-07-02")).unwrap();
        let outcome = flow.search(stay("2024-06-10", "2024-06-12")).unwrap();

        assert_eq!(outcome, SearchOutcome::NoAvailability);
        assert_eq!(flow.draft().unwrap().state_name(), "room selected");
    }

    #[test]
    fn test_choose_room_without_search_is_missing_draft() {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Room").unwrap();
        let store = MemorySessionStore::default();
        let flow = BookingFlow::new(&db, &store, SessionToken::generate());

        assert!(matches!(flow.choose_room(room.id), Err(Error::MissingDraft)));
        assert!(matches!(flow.reservation_form(), Err(Error::MissingDraft)));
        assert!(matches!(flow.submit(&alice()), Err(Error::MissingDraft)));
        assert!(matches!(flow.summary(), Err(Error::MissingDraft)));
    }

    #[test]
    fn test_book_unknown_room_is_not_found() {
        let db = create_test_database();
        let store = MemorySessionStore::default();
        let flow = BookingFlow::new(&db, &store, SessionToken::generate());

        let err = flow
            .book_room(RoomId::new(7), stay("2024-06-01", "2024-06-05"))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert!(flow.draft().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_form_keeps_draft() {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Room").unwrap();
        let store = MemorySessionStore::default();
        let flow = BookingFlow::new(&db, &store, SessionToken::generate());
        flow.book_room(room.id, stay("2024-06-01", "2024-06-05")).unwrap();

        let form = ReservationForm::new("Al", "", "nope", "");
        let SubmitOutcome::Invalid { form: echoed, errors } = flow.submit(&form).unwrap() else {
            panic!("expected validation errors");
        };
        assert_eq!(echoed, form);
        assert!(errors.get("first_name").is_some());
        assert!(errors.get("last_name").is_some());
        assert!(errors.get("email").is_some());
        assert_eq!(flow.draft().unwrap().state_name(), "room selected");
        assert!(Database::list_all_reservations(db.connection()).unwrap().is_empty());
    }

    #[test]
    fn test_repeat_submit_does_not_recommit() {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Room").unwrap();
        let store = MemorySessionStore::default();
        let flow = BookingFlow::new(&db, &store, SessionToken::generate());
        flow.book_room(room.id, stay("2024-06-01", "2024-06-05")).unwrap();

        let first = flow.submit(&alice()).unwrap();
        let second = flow.submit(&alice()).unwrap();

        assert_eq!(first, second);
        assert_eq!(Database::list_all_reservations(db.connection()).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_commit_leaves_details_pending() {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Room").unwrap();
        fail_restriction_inserts(&db);
        let store = MemorySessionStore::default();
        let flow = BookingFlow::new(&db, &store, SessionToken::generate())
            .with_commit(BookingCommit::new(&db).with_policy(CommitPolicy::Sequential));
        flow.book_room(room.id, stay("2024-06-01", "2024-06-05")).unwrap();

        let err = flow.submit(&alice()).unwrap_err();
        assert!(matches!(err, Error::PartialCommit { .. }));

        let draft = flow.draft().unwrap();
        assert_eq!(draft.state_name(), "details pending");
        assert!(matches!(flow.summary(), Err(Error::DraftState { .. })));

        // Re-opening the form shows what was submitted
        let view = flow.reservation_form().unwrap();
        assert_eq!(view.form.first_name, "Alice");
    }

    #[test]
    fn test_sessions_do_not_share_drafts() {
        let db = create_test_database();
        Database::insert_room(db.connection(), "Room").unwrap();
        let store = MemorySessionStore::default();
        let a = BookingFlow::new(&db, &store, SessionToken::generate());
        let b = BookingFlow::new(&db, &store, SessionToken::generate());

        a.search(stay("2024-06-01", "2024-06-05")).unwrap();
        assert!(b.draft().unwrap().is_empty());
    }

    /// Accepts every write except a committed draft.
    struct RejectCommitted(MemorySessionStore);

    impl SessionStore for RejectCommitted {
        fn get(&self, token: &SessionToken, key: &str) -> Result<Option<Vec<u8>>> {
            self.0.get(token, key)
        }

        fn put(&self, token: &SessionToken, key: &str, value: &[u8]) -> Result<()> {
            if String::from_utf8_lossy(value).contains(r#""state":"committed""#) {
                return Err(Error::Io(std::io::Error::other("session store full")));
            }
            self.0.put(token, key, value)
        }

        fn remove(&self, token: &SessionToken, key: &str) -> Result<()> {
            self.0.remove(token, key)
        }

        fn destroy(&self, token: &SessionToken) -> Result<()> {
            self.0.destroy(token)
        }

        fn renew(&self, token: &SessionToken) -> Result<SessionToken> {
            self.0.renew(token)
        }
    }

    #[test]
    fn test_unsaved_committed_draft_cannot_book_twice() {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Room").unwrap();
        let store = RejectCommitted(MemorySessionStore::default());
        let flow = BookingFlow::new(&db, &store, SessionToken::generate())
            .with_commit(BookingCommit::new(&db).with_recheck(false));
        flow.book_room(room.id, stay("2024-06-01", "2024-06-05")).unwrap();

        let outcome = flow.submit(&alice()).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Committed(_)));
        assert!(flow.draft().unwrap().is_empty());

        assert!(matches!(flow.submit(&alice()), Err(Error::MissingDraft)));
        assert_eq!(Database::list_all_reservations(db.connection()).unwrap().len(), 1);
    }
}
