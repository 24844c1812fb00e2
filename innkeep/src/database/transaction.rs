//! The two-write booking commit.
//!
//! A booking is a reservation row plus a `Reservation` restriction pointing
//! at it. [`Database::commit_booking`] writes both in one `IMMEDIATE`
//! transaction; [`Database::commit_booking_sequential`] writes them one
//! after the other and reports a half-done booking as
//! `Error::PartialCommit`.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::error::{Error, Result};
use crate::reservation::NewReservation;
use crate::room::RestrictionKind;

use super::connection::Database;

impl Database {
    /// Writes a booking atomically and returns the reservation id.
    ///
    /// The `IMMEDIATE` transaction takes the write lock up front, so two
    /// competing commits serialize. With `recheck` set, availability is
    /// checked again inside the transaction and a conflict aborts the
    /// commit with `Error::RoomUnavailable` before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `Error::RoomUnavailable` on a re-check conflict, or a
    /// database error. In every error case nothing is written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use innkeep::database::{Database, DatabaseConfig};
    /// use innkeep::reservation::NewReservation;
    /// use innkeep::validation::ReservationForm;
    /// use innkeep::{RoomId, StayRange};
    ///
    /// let db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
    /// let booking = NewReservation {
    ///     room_id: RoomId::new(1),
    ///     stay: StayRange::parse("2024-06-01", "2024-06-05").unwrap(),
    ///     guest: ReservationForm::new("Alice", "Lee", "a@b.com", "").validate().unwrap(),
    /// };
    /// let id = db
    ///     .with_deadline(|conn| Database::commit_booking(conn, &booking, true))
    ///     .unwrap();
    /// ```
    pub fn commit_booking(conn: &Connection, booking: &NewReservation, recheck: bool) -> Result<i64> {
        // Session stores borrow the same connection, so no `&mut` here
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

        if recheck {
            Self::ensure_room_free(&tx, &booking.stay, booking.room_id)?;
        }

        let reservation_id = Self::insert_reservation(&tx, booking)?;
        Self::insert_room_restriction(
            &tx,
            booking.room_id,
            &booking.stay,
            Some(reservation_id),
            RestrictionKind::Reservation,
        )?;

        tx.commit()?;
        log::info!(
            "Committed reservation {reservation_id} for room {} ({})",
            booking.room_id,
            booking.stay
        );
        Ok(reservation_id)
    }

    /// Writes a booking as two independent statements.
    ///
    /// No availability re-check is made. If the restriction insert fails
    /// the reservation row stays behind without one.
    ///
    /// # Errors
    ///
    /// Returns a database error if the reservation insert fails (nothing
    /// written), or `Error::PartialCommit` if only the reservation was
    /// written.
    pub fn commit_booking_sequential(conn: &Connection, booking: &NewReservation) -> Result<i64> {
        let reservation_id = Self::insert_reservation(conn, booking)?;

        if let Err(e) = Self::insert_room_restriction(
            conn,
            booking.room_id,
            &booking.stay,
            Some(reservation_id),
            RestrictionKind::Reservation,
        ) {
            log::error!(
                "Reservation {reservation_id} saved but room restriction for room {} ({}) failed: {e}",
                booking.room_id,
                booking.stay
            );
            return Err(Error::PartialCommit {
                reservation_id,
                source: Box::new(e),
            });
        }

        log::info!(
            "Committed reservation {reservation_id} for room {} ({})",
            booking.room_id,
            booking.stay
        );
        Ok(reservation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{
        create_test_database, fail_restriction_inserts, new_reservation,
    };
    use crate::StayRange;

    fn count(db: &Database, table: &str) -> i64 {
        db.connection()
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .unwrap()
    }

    #[test]
    fn test_commit_writes_reservation_and_restriction() {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Room").unwrap();
        let booking = new_reservation(room.id, "2024-06-01", "2024-06-05");

        let id = Database::commit_booking(db.connection(), &booking, true).unwrap();

        let restrictions =
            Database::list_room_restrictions(db.connection(), room.id, &booking.stay).unwrap();
        assert_eq!(restrictions.len(), 1);
        assert_eq!(restrictions[0].reservation_id, Some(id));
        assert_eq!(restrictions[0].kind, RestrictionKind::Reservation);
        assert_eq!(restrictions[0].stay, booking.stay);
    }

    #[test]
    fn test_recheck_conflict_writes_nothing() {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Room").unwrap();
        let first = new_reservation(room.id, "2024-06-01", "2024-06-05");
        Database::commit_booking(db.connection(), &first, true).unwrap();

        let second = new_reservation(room.id, "2024-06-04", "2024-06-06");
        let err = Database::commit_booking(db.connection(), &second, true).unwrap_err();

        assert!(matches!(err, Error::RoomUnavailable { .. }));
        assert_eq!(count(&db, "reservations"), 1);
        assert_eq!(count(&db, "room_restrictions"), 1);
    }

    #[test]
    fn test_without_recheck_overlap_is_written() {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Room").unwrap();
        let first = new_reservation(room.id, "2024-06-01", "2024-06-05");
        Database::commit_booking(db.connection(), &first, false).unwrap();
        let second = new_reservation(room.id, "2024-06-04", "2024-06-06");
        Database::commit_booking(db.connection(), &second, false).unwrap();

        assert_eq!(count(&db, "reservations"), 2);
    }

    #[test]
    fn test_transactional_restriction_failure_rolls_back() {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Room").unwrap();
        fail_restriction_inserts(&db);

        let booking = new_reservation(room.id, "2024-06-01", "2024-06-05");
        let err = Database::commit_booking(db.connection(), &booking, true).unwrap_err();

        assert!(matches!(err, Error::Database(_)));
        assert_eq!(count(&db, "reservations"), 0);
    }

    #[test]
    fn test_sequential_restriction_failure_is_partial() {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Room").unwrap();
        fail_restriction_inserts(&db);

        let booking = new_reservation(room.id, "2024-06-01", "2024-06-05");
        let err = Database::commit_booking_sequential(db.connection(), &booking).unwrap_err();

        let Error::PartialCommit { reservation_id, .. } = err else {
            panic!("expected PartialCommit, got {err:?}");
        };
        assert!(Database::get_reservation(db.connection(), reservation_id)
            .unwrap()
            .is_some());
        assert_eq!(count(&db, "room_restrictions"), 0);

        // The orphan does not block the room
        let stay = StayRange::parse("2024-06-01", "2024-06-05").unwrap();
        assert!(Database::search_room(db.connection(), &stay, room.id).unwrap());
    }

    #[test]
    fn test_sequential_success() {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Room").unwrap();
        let booking = new_reservation(room.id, "2024-06-01", "2024-06-05");

        let id = Database::commit_booking_sequential(db.connection(), &booking).unwrap();
        assert!(Database::get_reservation(db.connection(), id).unwrap().is_some());
        assert_eq!(count(&db, "room_restrictions"), 1);
    }
}
