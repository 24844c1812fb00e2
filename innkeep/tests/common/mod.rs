//! Common test utilities for integration tests.
//!
//! This module provides helper functions and fixture builders for testing
//! the innkeep library.

use std::path::PathBuf;

use tempfile::TempDir;

use innkeep::database::{Database, DatabaseConfig};
use innkeep::validation::ReservationForm;
use innkeep::{GuestDetails, NewReservation, Room, RoomId, StayRange};

/// A database in its own temporary directory.
///
/// The directory is removed when the fixture is dropped.
#[allow(dead_code)]
pub struct TestDatabase {
    pub dir: TempDir,
    pub path: PathBuf,
    pub db: Database,
}

impl TestDatabase {
    /// Opens a fresh database with an empty room catalog.
    #[allow(dead_code)]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("innkeep.db");
        let db = Database::open(DatabaseConfig::new(&path)).unwrap();
        Self { dir, path, db }
    }

    /// Opens another handle on the same file.
    #[allow(dead_code)]
    pub fn reopen(&self) -> Database {
        Database::open(DatabaseConfig::new(&self.path)).unwrap()
    }

    /// Adds rooms with the given names and returns them in order.
    #[allow(dead_code)]
    pub fn with_rooms(&mut self, names: &[&str]) -> Vec<Room> {
        let names: Vec<String> = names.iter().map(ToString::to_string).collect();
        self.db.seed_rooms(&names).unwrap()
    }
}

/// Parses a stay, panicking on bad input.
#[allow(dead_code)]
pub fn stay(start: &str, end: &str) -> StayRange {
    StayRange::parse(start, end).unwrap()
}

/// A valid booking form.
#[allow(dead_code)]
pub fn guest_form() -> ReservationForm {
    ReservationForm::new("Alice", "Lee", "alice@example.com", "555-0100")
}

/// Validated guest details from [`guest_form`].
#[allow(dead_code)]
pub fn guest() -> GuestDetails {
    guest_form().validate().unwrap()
}

/// A booking of `room` over `start..end` by [`guest`].
#[allow(dead_code)]
pub fn booking(room: RoomId, start: &str, end: &str) -> NewReservation {
    NewReservation {
        room_id: room,
        stay: stay(start, end),
        guest: guest(),
    }
}

/// Makes every later room restriction insert on `db`'s file fail.
#[allow(dead_code)]
pub fn fail_restriction_inserts(db: &Database) {
    db.connection()
        .execute_batch(
            "CREATE TRIGGER fail_restrictions BEFORE INSERT ON room_restrictions
             BEGIN SELECT RAISE(ABORT, 'restriction insert failed'); END;",
        )
        .unwrap();
}
