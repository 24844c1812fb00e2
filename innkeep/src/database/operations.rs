//! Database CRUD operations for rooms and reservations.
//!
//! Every operation is an associated function over a borrowed connection, so
//! the same code runs standalone, under a per-call deadline, or inside the
//! booking transaction.

use std::time::{Duration, SystemTime};

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::error::{Error, Result};
use crate::reservation::{GuestDetails, NewReservation, Reservation};
use crate::room::{Room, RoomId};
use crate::stay::StayRange;

use super::connection::Database;
use super::schema::INSERT_RESERVATION;

/// Converts a `SystemTime` to Unix epoch seconds for database storage.
///
/// # Errors
///
/// Returns an error if the time is before the Unix epoch.
#[allow(clippy::cast_possible_wrap)]
pub(super) fn systemtime_to_unix_secs(time: SystemTime) -> Result<i64> {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| Error::Validation {
            field: "timestamp".into(),
            message: format!("Invalid timestamp: {e}"),
        })
        .map(|d| d.as_secs() as i64)
}

/// Converts Unix epoch seconds from the database to a `SystemTime`.
#[allow(clippy::cast_sign_loss)]
pub(super) fn unix_secs_to_systemtime(secs: i64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs.max(0) as u64)
}

/// Rebuilds a stay from two date columns.
pub(super) fn stay_from_columns(
    row: &rusqlite::Row<'_>,
    start_idx: usize,
    end_idx: usize,
) -> rusqlite::Result<StayRange> {
    let start: NaiveDate = row.get(start_idx)?;
    let end: NaiveDate = row.get(end_idx)?;
    StayRange::new(start, end).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(start_idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Expects: id, `room_name`, `created_at`, `updated_at`
pub(super) fn row_to_room(row: &rusqlite::Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: RoomId::new(row.get(0)?),
        name: row.get(1)?,
        created_at: unix_secs_to_systemtime(row.get(2)?),
        updated_at: unix_secs_to_systemtime(row.get(3)?),
    })
}

/// Expects the column order of `SELECT_RESERVATION_COLUMNS`.
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: i64 = row.get(0)?;
    let guest = GuestDetails::from_trusted(row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?);
    let stay = stay_from_columns(row, 5, 6)?;
    let room_id = RoomId::new(row.get(7)?);
    let room_name: String = row.get(8)?;
    let processed: i64 = row.get(9)?;

    Ok(Reservation::builder(id, room_id, stay, guest)
        .room_name(room_name)
        .processed(processed != 0)
        .created_at(unix_secs_to_systemtime(row.get(10)?))
        .updated_at(unix_secs_to_systemtime(row.get(11)?))
        .build())
}

const INSERT_ROOM: &str = r"
    INSERT INTO rooms (room_name, created_at, updated_at)
    VALUES (?, ?, ?)
";

const SELECT_ROOM: &str = r"
    SELECT id, room_name, created_at, updated_at
    FROM rooms
    WHERE id = ?
";

const SELECT_ROOM_BY_NAME: &str = r"
    SELECT id, room_name, created_at, updated_at
    FROM rooms
    WHERE room_name = ?
    ORDER BY id
    LIMIT 1
";

const LIST_ROOMS: &str = r"
    SELECT id, room_name, created_at, updated_at
    FROM rooms
    ORDER BY room_name, id
";

const SELECT_RESERVATION_COLUMNS: &str = r"
    SELECT r.id, r.first_name, r.last_name, r.email, r.phone,
           r.start_date, r.end_date, r.room_id, rm.room_name,
           r.processed, r.created_at, r.updated_at
    FROM reservations r
    LEFT JOIN rooms rm ON rm.id = r.room_id
";

const UPDATE_GUEST: &str = r"
    UPDATE reservations
    SET first_name = ?, last_name = ?, email = ?, phone = ?, updated_at = ?
    WHERE id = ?
";

const UPDATE_PROCESSED: &str = r"
    UPDATE reservations
    SET processed = ?, updated_at = ?
    WHERE id = ?
";

const DELETE_RESERVATION: &str = "DELETE FROM reservations WHERE id = ?";

impl Database {
    /// Adds a room to the catalog and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_room(conn: &Connection, name: &str) -> Result<Room> {
        let now = SystemTime::now();
        let secs = systemtime_to_unix_secs(now)?;
        conn.execute(INSERT_ROOM, params![name, secs, secs])?;

        Ok(Room {
            id: RoomId::new(conn.last_insert_rowid()),
            name: name.to_string(),
            created_at: unix_secs_to_systemtime(secs),
            updated_at: unix_secs_to_systemtime(secs),
        })
    }

    /// Inserts every configured room name that is not in the catalog yet.
    ///
    /// Returns the rooms that were added. Existing rooms are matched by
    /// name and left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or an insert fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use innkeep::database::{Database, DatabaseConfig};
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
    /// let names = vec!["General's Quarters".to_string(), "Major's Suite".to_string()];
    /// let added = db.seed_rooms(&names).unwrap();
    /// ```
    pub fn seed_rooms(&mut self, names: &[String]) -> Result<Vec<Room>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut added = Vec::new();
        for name in names {
            let name = name.trim();
            if Self::find_room_by_name(&tx, name)?.is_none() {
                added.push(Self::insert_room(&tx, name)?);
            }
        }

        tx.commit()?;
        if !added.is_empty() {
            log::info!("Seeded {} room(s)", added.len());
        }
        Ok(added)
    }

    /// Looks up a room by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    pub fn get_room(conn: &Connection, id: RoomId) -> Result<Option<Room>> {
        Ok(conn
            .query_row(SELECT_ROOM, [id.value()], row_to_room)
            .optional()?)
    }

    /// Looks up a room by identifier, failing with `Error::NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown id, or a database error.
    pub fn require_room(conn: &Connection, id: RoomId) -> Result<Room> {
        Self::get_room(conn, id)?.ok_or_else(|| Error::NotFound {
            resource: format!("room {id}"),
        })
    }

    /// Looks up a room by exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_room_by_name(conn: &Connection, name: &str) -> Result<Option<Room>> {
        Ok(conn
            .query_row(SELECT_ROOM_BY_NAME, [name], row_to_room)
            .optional()?)
    }

    /// Lists all rooms ordered by name, then id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_rooms(conn: &Connection) -> Result<Vec<Room>> {
        let mut stmt = conn.prepare(LIST_ROOMS)?;
        let rooms = stmt
            .query_map([], row_to_room)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rooms)
    }

    /// Inserts a reservation row and returns its identifier.
    ///
    /// This does not touch room restrictions; the booking commit pairs it
    /// with [`Database::insert_room_restriction`].
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including when the room does
    /// not exist (foreign key).
    pub fn insert_reservation(conn: &Connection, reservation: &NewReservation) -> Result<i64> {
        let now = systemtime_to_unix_secs(SystemTime::now())?;
        let guest = &reservation.guest;

        conn.execute(
            INSERT_RESERVATION,
            params![
                guest.first_name(),
                guest.last_name(),
                guest.email(),
                guest.phone(),
                reservation.stay.start(),
                reservation.stay.end(),
                reservation.room_id.value(),
                now,
                now,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Retrieves a reservation with its room name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    ///
    /// # Returns
    ///
    /// - `Ok(Some(reservation))` if the reservation exists
    /// - `Ok(None)` if the reservation doesn't exist
    pub fn get_reservation(conn: &Connection, id: i64) -> Result<Option<Reservation>> {
        let sql = format!("{SELECT_RESERVATION_COLUMNS} WHERE r.id = ?");
        Ok(conn.query_row(&sql, [id], row_to_reservation).optional()?)
    }

    /// Lists all reservations, earliest stay first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn list_all_reservations(conn: &Connection) -> Result<Vec<Reservation>> {
        let sql = format!("{SELECT_RESERVATION_COLUMNS} ORDER BY r.start_date, r.id");
        Self::query_reservations(conn, &sql)
    }

    /// Lists reservations staff has not processed yet, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn list_new_reservations(conn: &Connection) -> Result<Vec<Reservation>> {
        let sql =
            format!("{SELECT_RESERVATION_COLUMNS} WHERE r.processed = 0 ORDER BY r.created_at, r.id");
        Self::query_reservations(conn, &sql)
    }

    fn query_reservations(conn: &Connection, sql: &str) -> Result<Vec<Reservation>> {
        let mut stmt = conn.prepare(sql)?;
        let reservations = stmt
            .query_map([], row_to_reservation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reservations)
    }

    /// Replaces the guest details of a reservation.
    ///
    /// Dates and room are not editable here.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the reservation was found and updated
    /// - `Ok(false)` if the reservation was not found
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_reservation_guest(
        conn: &Connection,
        id: i64,
        guest: &GuestDetails,
    ) -> Result<bool> {
        let now = systemtime_to_unix_secs(SystemTime::now())?;
        let rows_affected = conn.execute(
            UPDATE_GUEST,
            params![
                guest.first_name(),
                guest.last_name(),
                guest.email(),
                guest.phone(),
                now,
                id
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Sets or clears the processed flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_reservation_processed(conn: &Connection, id: i64, processed: bool) -> Result<bool> {
        let now = systemtime_to_unix_secs(SystemTime::now())?;
        let rows_affected =
            conn.execute(UPDATE_PROCESSED, params![i64::from(processed), now, id])?;
        Ok(rows_affected > 0)
    }

    /// Deletes a reservation; its room restrictions go with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_reservation(conn: &Connection, id: i64) -> Result<bool> {
        let rows_affected = conn.execute(DELETE_RESERVATION, [id])?;
        Ok(rows_affected > 0)
    }
}
