//! Shared test utilities for database unit tests.
//!
//! This module provides helper functions used across multiple database test modules.

use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::reservation::{GuestDetails, NewReservation};
use crate::room::RoomId;
use crate::stay::StayRange;

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// Guest details with an empty phone number.
#[must_use]
pub fn guest(first: &str, last: &str, email: &str) -> GuestDetails {
    GuestDetails::from_trusted(first.into(), last.into(), email.into(), String::new())
}

/// A booking for `room` over `start..end` by a fixed guest.
///
/// # Panics
///
/// Panics if the dates do not form a valid stay.
#[must_use]
pub fn new_reservation(room: RoomId, start: &str, end: &str) -> NewReservation {
    NewReservation {
        room_id: room,
        stay: StayRange::parse(start, end).unwrap(),
        guest: guest("Alice", "Lee", "alice@example.com"),
    }
}

/// Makes every later room restriction insert fail.
///
/// # Panics
///
/// Panics if the trigger cannot be created.
pub fn fail_restriction_inserts(db: &Database) {
    db.connection()
        .execute_batch(
            "CREATE TRIGGER fail_restrictions BEFORE INSERT ON room_restrictions
             BEGIN SELECT RAISE(ABORT, 'restriction insert failed'); END;",
        )
        .unwrap();
}
