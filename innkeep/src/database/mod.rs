//! Database layer for rooms, reservations, restrictions, and sessions.
//!
//! This module provides a SQLite-based storage layer with schema
//! versioning, the availability search, the booking commit, and a
//! persistent session store.
//!
//! # Examples
//!
//! ```no_run
//! use innkeep::database::{Database, DatabaseConfig};
//! use innkeep::StayRange;
//!
//! // Open a database
//! let config = DatabaseConfig::new("/tmp/innkeep.db");
//! let mut db = Database::open(config).unwrap();
//!
//! // Seed the catalog
//! db.seed_rooms(&["Major's Suite".to_string()]).unwrap();
//!
//! // Search under the per-call deadline
//! let stay = StayRange::parse("2024-06-01", "2024-06-05").unwrap();
//! let free = db
//!     .with_deadline(|conn| Database::search_all_rooms(conn, &stay))
//!     .unwrap();
//! for room in free {
//!     println!("{}: {}", room.id, room.name);
//! }
//! ```

mod availability;
mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;
mod sessions;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

// Re-export public API
pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
    DATA_DIR_ENV,
};
pub use connection::Database;
pub use sessions::SqliteSessionStore;

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
