//! Staff operations on reservations and room blocks.
//!
//! Every mutation reports failure to the caller; a missing reservation is
//! `Error::NotFound`, never a silent success.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::Reservation;
use crate::room::{RoomId, RoomRestriction};
use crate::stay::StayRange;
use crate::validation::ReservationForm;

/// Which reservation list an admin action came from.
///
/// Also selects the list itself: `New` is the unprocessed reservations,
/// `All` is everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationSource {
    /// Unprocessed reservations.
    New,
    /// All reservations.
    #[default]
    All,
}

impl ReservationSource {
    /// Returns the tag used in paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::All => "all",
        }
    }

    /// Returns the list page to go back to.
    ///
    /// # Examples
    ///
    /// ```
    /// use innkeep::operations::ReservationSource;
    ///
    /// assert_eq!(ReservationSource::New.redirect(), "/admin/reservations-new");
    /// ```
    #[must_use]
    pub fn redirect(self) -> String {
        format!("/admin/reservations-{}", self.as_str())
    }
}

impl fmt::Display for ReservationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "all" => Ok(Self::All),
            other => Err(Error::Validation {
                field: "src".into(),
                message: format!("unknown reservation list '{other}' (expected new or all)"),
            }),
        }
    }
}

/// Where to send the admin after a mutation, and what to tell them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminOutcome {
    /// One-line confirmation.
    pub flash: &'static str,
    /// List page to go back to.
    pub redirect: String,
}

impl AdminOutcome {
    fn new(flash: &'static str, src: ReservationSource) -> Self {
        Self {
            flash,
            redirect: src.redirect(),
        }
    }
}

/// Admin reservation manager.
///
/// # Examples
///
/// ```no_run
/// use innkeep::database::{Database, DatabaseConfig};
/// use innkeep::operations::{AdminReservations, ReservationSource};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
/// let admin = AdminReservations::new(&db);
///
/// for reservation in admin.list(ReservationSource::New).unwrap() {
///     let outcome = admin.process(reservation.id(), ReservationSource::New).unwrap();
///     println!("{} -> {}", outcome.flash, outcome.redirect);
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AdminReservations<'a> {
    db: &'a Database,
}

impl<'a> AdminReservations<'a> {
    /// Creates a manager over `db`.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Lists the reservations of one list.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub fn list(&self, src: ReservationSource) -> Result<Vec<Reservation>> {
        self.db.with_deadline(|conn| match src {
            ReservationSource::New => Database::list_new_reservations(conn),
            ReservationSource::All => Database::list_all_reservations(conn),
        })
    }

    /// Returns one reservation.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown id, or a storage error.
    pub fn show(&self, id: i64) -> Result<Reservation> {
        self.db
            .with_deadline(|conn| Database::get_reservation(conn, id))?
            .ok_or_else(|| not_found(id))
    }

    /// Replaces the guest details of a reservation.
    ///
    /// The form goes through the same validation as the booking form.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for rejected fields, `Error::NotFound`
    /// for an unknown id, or a storage error.
    pub fn update(
        &self,
        id: i64,
        form: &ReservationForm,
        src: ReservationSource,
    ) -> Result<AdminOutcome> {
        let guest = form.validate().map_err(|errors| Error::Validation {
            field: "reservation".into(),
            message: errors.to_string(),
        })?;

        let updated = self
            .db
            .with_deadline(|conn| Database::update_reservation_guest(conn, id, &guest))?;
        if !updated {
            return Err(not_found(id));
        }

        log::info!("Updated guest details of reservation {id}");
        Ok(AdminOutcome::new("Changes saved", src))
    }

    /// Marks a reservation processed.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown id, or a storage error.
    pub fn process(&self, id: i64, src: ReservationSource) -> Result<AdminOutcome> {
        let updated = self
            .db
            .with_deadline(|conn| Database::set_reservation_processed(conn, id, true))?;
        if !updated {
            return Err(not_found(id));
        }

        log::info!("Marked reservation {id} processed");
        Ok(AdminOutcome::new("Reservation marked as processed", src))
    }

    /// Deletes a reservation and the room restriction it holds.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown id, or a storage error.
    pub fn delete(&self, id: i64, src: ReservationSource) -> Result<AdminOutcome> {
        let deleted = self
            .db
            .with_deadline(|conn| Database::delete_reservation(conn, id))?;
        if !deleted {
            return Err(not_found(id));
        }

        log::info!("Deleted reservation {id}");
        Ok(AdminOutcome::new("Reservation deleted", src))
    }

    /// Blocks a room over `stay` and returns the restriction id.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown room, or a storage error.
    pub fn block(&self, room_id: RoomId, stay: &StayRange) -> Result<i64> {
        self.db
            .with_deadline(|conn| Database::insert_owner_block(conn, room_id, stay))
    }

    /// Removes an owner block.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no owner block has this id, or a
    /// storage error.
    pub fn unblock(&self, restriction_id: i64) -> Result<()> {
        let deleted = self
            .db
            .with_deadline(|conn| Database::delete_owner_block(conn, restriction_id))?;
        if !deleted {
            return Err(Error::NotFound {
                resource: format!("owner block {restriction_id}"),
            });
        }
        log::info!("Removed owner block {restriction_id}");
        Ok(())
    }

    /// Lists a room's restrictions over `window`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown room, or a storage error.
    pub fn restrictions(&self, room_id: RoomId, window: &StayRange) -> Result<Vec<RoomRestriction>> {
        self.db.with_deadline(|conn| {
            Database::require_room(conn, room_id)?;
            Database::list_room_restrictions(conn, room_id, window)
        })
    }
}

fn not_found(id: i64) -> Error {
    Error::NotFound {
        resource: format!("reservation {id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, new_reservation};
    use crate::room::RestrictionKind;

    fn setup() -> (Database, RoomId, i64) {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Room").unwrap();
        let booking = new_reservation(room.id, "2024-06-01", "2024-06-05");
        let id = Database::commit_booking(db.connection(), &booking, true).unwrap();
        (db, room.id, id)
    }

    #[test]
    fn test_source_parse_and_redirect() {
        assert_eq!("new".parse::<ReservationSource>().unwrap(), ReservationSource::New);
        assert_eq!(" ALL ".parse::<ReservationSource>().unwrap(), ReservationSource::All);
        assert!("cal".parse::<ReservationSource>().is_err());
        assert_eq!(ReservationSource::All.redirect(), "/admin/reservations-all");
    }

    #[test]
    fn test_process_moves_out_of_new_list() {
        let (db, _, id) = setup();
        let admin = AdminReservations::new(&db);

        assert_eq!(admin.list(ReservationSource::New).unwrap().len(), 1);
        let outcome = admin.process(id, ReservationSource::New).unwrap();
        assert_eq!(outcome.flash, "Reservation marked as processed");
        assert_eq!(outcome.redirect, "/admin/reservations-new");

        assert!(admin.list(ReservationSource::New).unwrap().is_empty());
        assert!(admin.show(id).unwrap().is_processed());
        assert_eq!(admin.list(ReservationSource::All).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_id_is_not_found() {
        let (db, _, _) = setup();
        let admin = AdminReservations::new(&db);

        assert!(matches!(admin.show(999), Err(Error::NotFound { .. })));
        assert!(matches!(
            admin.process(999, ReservationSource::All),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            admin.delete(999, ReservationSource::All),
            Err(Error::NotFound { .. })
        ));
        let form = ReservationForm::new("Bobby", "Tables", "b@example.com", "");
        assert!(matches!(
            admin.update(999, &form, ReservationSource::All),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_update_validates() {
        let (db, _, id) = setup();
        let admin = AdminReservations::new(&db);

        let err = admin
            .update(id, &ReservationForm::new("", "Lee", "x", ""), ReservationSource::All)
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));

        let outcome = admin
            .update(
                id,
                &ReservationForm::new("Bobby", "Tables", "b@example.com", "555"),
                ReservationSource::All,
            )
            .unwrap();
        assert_eq!(outcome.flash, "Changes saved");
        assert_eq!(admin.show(id).unwrap().guest().first_name(), "Bobby");
    }

    #[test]
    fn test_delete_frees_the_room() {
        let (db, room, id) = setup();
        let admin = AdminReservations::new(&db);
        let stay = StayRange::parse("2024-06-01", "2024-06-05").unwrap();

        assert!(!Database::search_room(db.connection(), &stay, room).unwrap());
        admin.delete(id, ReservationSource::All).unwrap();
        assert!(Database::search_room(db.connection(), &stay, room).unwrap());
    }

    #[test]
    fn test_block_and_unblock() {
        let (db, room, _) = setup();
        let admin = AdminReservations::new(&db);
        let window = StayRange::parse("2024-06-01", "2024-07-01").unwrap();

        let block = admin
            .block(room, &StayRange::parse("2024-06-20", "2024-06-22").unwrap())
            .unwrap();
        let listed = admin.restrictions(room, &window).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed
            .iter()
            .any(|r| r.id == block && r.kind == RestrictionKind::OwnerBlock));

        admin.unblock(block).unwrap();
        assert!(matches!(admin.unblock(block), Err(Error::NotFound { .. })));
        assert_eq!(admin.restrictions(room, &window).unwrap().len(), 1);

        assert!(matches!(
            admin.restrictions(RoomId::new(404), &window),
            Err(Error::NotFound { .. })
        ));
    }
}
