//! Booking and admin operations.
//!
//! These are the operations a request handler runs: each one takes the
//! database (and, for the visitor flow, one session's draft) explicitly and
//! runs every storage call under the per-call deadline.
//!
//! # Examples
//!
//! ```no_run
//! use innkeep::config::ConfigBuilder;
//! use innkeep::database::{Database, DatabaseConfig, SqliteSessionStore};
//! use innkeep::operations::{BookingCommit, BookingFlow};
//! use innkeep::session::SessionToken;
//! use innkeep::{RoomId, StayRange};
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! let db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
//! let store = SqliteSessionStore::new(db.connection());
//!
//! let flow = BookingFlow::new(&db, &store, SessionToken::generate())
//!     .with_commit(BookingCommit::from_config(&db, &config));
//!
//! let stay = StayRange::parse("2024-06-01", "2024-06-05").unwrap();
//! flow.book_room(RoomId::new(1), stay).unwrap();
//! ```

pub mod admin;
pub mod commit;
pub mod flow;
pub mod init;
pub mod search;

#[cfg(test)]
mod proptests;

pub use admin::{AdminOutcome, AdminReservations, ReservationSource};
pub use commit::{BookingCommit, CommittedBooking};
pub use flow::{BookingFlow, ReservationSummary, ReservationView, SubmitOutcome};
pub use init::{init_database, InitOptions, InitResult};
pub use search::{
    check_room_availability, AvailabilityResponse, SearchOutcome, NO_AVAILABILITY_MESSAGE,
};
