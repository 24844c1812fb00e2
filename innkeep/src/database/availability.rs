//! Availability search and room restrictions.
//!
//! A restriction `[rs, re)` blocks a stay `[s, e)` when `rs < e AND re > s`.
//! Stays that only touch at a boundary do not conflict.

use std::time::SystemTime;

use rusqlite::{params, Connection};

use crate::error::{Error, Result};
use crate::room::{RestrictionKind, Room, RoomId, RoomRestriction};
use crate::stay::StayRange;

use super::connection::Database;
use super::operations::{
    row_to_room, stay_from_columns, systemtime_to_unix_secs, unix_secs_to_systemtime,
};
use super::schema::{COUNT_OVERLAPPING_RESTRICTIONS, INSERT_ROOM_RESTRICTION};

const SEARCH_ALL_ROOMS: &str = r"
    SELECT rm.id, rm.room_name, rm.created_at, rm.updated_at
    FROM rooms rm
    WHERE NOT EXISTS (
        SELECT 1
        FROM room_restrictions rr
        WHERE rr.room_id = rm.id AND rr.start_date < ?2 AND rr.end_date > ?1
    )
    ORDER BY rm.room_name, rm.id
";

const LIST_ROOM_RESTRICTIONS: &str = r"
    SELECT id, start_date, end_date, room_id, reservation_id, restriction_id,
           created_at, updated_at
    FROM room_restrictions
    WHERE room_id = ?1 AND start_date < ?3 AND end_date > ?2
    ORDER BY start_date, id
";

const SELECT_RESTRICTION: &str = r"
    SELECT id, start_date, end_date, room_id, reservation_id, restriction_id,
           created_at, updated_at
    FROM room_restrictions
    WHERE id = ?
";

const DELETE_OWNER_BLOCK: &str =
    "DELETE FROM room_restrictions WHERE id = ? AND reservation_id IS NULL AND restriction_id = ?";

fn row_to_restriction(row: &rusqlite::Row<'_>) -> rusqlite::Result<RoomRestriction> {
    let stay = stay_from_columns(row, 1, 2)?;
    let kind_id: i64 = row.get(5)?;
    let kind = RestrictionKind::from_id(kind_id).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Integer,
            format!("unknown restriction kind {kind_id}").into(),
        )
    })?;

    Ok(RoomRestriction {
        id: row.get(0)?,
        room_id: RoomId::new(row.get(3)?),
        stay,
        reservation_id: row.get(4)?,
        kind,
        created_at: unix_secs_to_systemtime(row.get(6)?),
        updated_at: unix_secs_to_systemtime(row.get(7)?),
    })
}

impl Database {
    /// Returns every room with no restriction overlapping `stay`.
    ///
    /// Rooms without any restriction are included. Results are ordered by
    /// room name, then id. An empty result is a valid answer, never an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use innkeep::database::{Database, DatabaseConfig};
    /// use innkeep::StayRange;
    ///
    /// let db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
    /// let stay = StayRange::parse("2024-06-01", "2024-06-05").unwrap();
    /// for room in Database::search_all_rooms(db.connection(), &stay).unwrap() {
    ///     println!("{} is free", room.name);
    /// }
    /// ```
    pub fn search_all_rooms(conn: &Connection, stay: &StayRange) -> Result<Vec<Room>> {
        let mut stmt = conn.prepare_cached(SEARCH_ALL_ROOMS)?;
        let rooms = stmt
            .query_map(params![stay.start(), stay.end()], row_to_room)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        log::debug!("{} room(s) free for {stay}", rooms.len());
        Ok(rooms)
    }

    /// Returns whether one room has zero restrictions overlapping `stay`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown room, or a database error.
    pub fn search_room(conn: &Connection, stay: &StayRange, room_id: RoomId) -> Result<bool> {
        Self::require_room(conn, room_id)?;
        Ok(Self::count_overlapping(conn, stay, room_id)? == 0)
    }

    /// Counts restrictions on `room_id` that overlap `stay`.
    ///
    /// Does not check that the room exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_overlapping(conn: &Connection, stay: &StayRange, room_id: RoomId) -> Result<i64> {
        let mut stmt = conn.prepare_cached(COUNT_OVERLAPPING_RESTRICTIONS)?;
        let count = stmt.query_row(
            params![room_id.value(), stay.start(), stay.end()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Inserts a room restriction and returns its identifier.
    ///
    /// No overlap check is made here.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, e.g. for an unknown room or
    /// reservation.
    pub fn insert_room_restriction(
        conn: &Connection,
        room_id: RoomId,
        stay: &StayRange,
        reservation_id: Option<i64>,
        kind: RestrictionKind,
    ) -> Result<i64> {
        let now = systemtime_to_unix_secs(SystemTime::now())?;
        conn.execute(
            INSERT_ROOM_RESTRICTION,
            params![
                stay.start(),
                stay.end(),
                room_id.value(),
                reservation_id,
                kind.id(),
                now,
                now,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Blocks a room for maintenance or owner use.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for an unknown room, or a database error.
    pub fn insert_owner_block(conn: &Connection, room_id: RoomId, stay: &StayRange) -> Result<i64> {
        Self::require_room(conn, room_id)?;
        let id =
            Self::insert_room_restriction(conn, room_id, stay, None, RestrictionKind::OwnerBlock)?;
        log::info!("Blocked room {room_id} for {stay} (restriction {id})");
        Ok(id)
    }

    /// Removes an owner block.
    ///
    /// Restrictions created by reservations are never removed here; they
    /// go away with their reservation.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the block was found and deleted
    /// - `Ok(false)` if no owner block has this id
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_owner_block(conn: &Connection, restriction_id: i64) -> Result<bool> {
        let rows_affected = conn.execute(
            DELETE_OWNER_BLOCK,
            params![restriction_id, RestrictionKind::OwnerBlock.id()],
        )?;
        Ok(rows_affected > 0)
    }

    /// Looks up a restriction by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    pub fn get_room_restriction(conn: &Connection, id: i64) -> Result<Option<RoomRestriction>> {
        match conn.query_row(SELECT_RESTRICTION, [id], row_to_restriction) {
            Ok(restriction) => Ok(Some(restriction)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists the restrictions of one room that overlap `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn list_room_restrictions(
        conn: &Connection,
        room_id: RoomId,
        window: &StayRange,
    ) -> Result<Vec<RoomRestriction>> {
        let mut stmt = conn.prepare(LIST_ROOM_RESTRICTIONS)?;
        let restrictions = stmt
            .query_map(
                params![room_id.value(), window.start(), window.end()],
                row_to_restriction,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(restrictions)
    }

    /// Fails with `Error::RoomUnavailable` if anything overlaps `stay`.
    ///
    /// # Errors
    ///
    /// Returns `Error::RoomUnavailable` on conflict, or a database error.
    pub fn ensure_room_free(conn: &Connection, stay: &StayRange, room_id: RoomId) -> Result<()> {
        if Self::count_overlapping(conn, stay, room_id)? > 0 {
            return Err(Error::RoomUnavailable {
                room_id,
                start: stay.start_str(),
                end: stay.end_str(),
            });
        }
        Ok(())
    }
}
