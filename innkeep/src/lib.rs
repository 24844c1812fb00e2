#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # innkeep
//!
//! A library for hotel room availability search and reservation booking.
//!
//! Visitors search a date range, pick a room, submit their details, and get
//! a confirmation; staff list, process, update, and delete reservations.
//! The in-progress booking lives in a per-session draft, and a completed
//! booking is written as a reservation plus the room restriction that makes
//! the room unavailable for those nights.
//!
//! ## Core Types
//!
//! - [`StayRange`]: Date-only `[start, end)` ranges with strict overlap
//! - [`Room`], [`RoomId`], [`RoomRestriction`]: The room catalog and blocks
//! - [`Reservation`]: Committed bookings
//! - [`draft::Draft`]: The session-carried booking in progress
//! - [`operations::BookingFlow`] and [`operations::AdminReservations`]:
//!   The visitor and staff operations
//! - [`Error`] and [`Result`]: Error handling types
//!
//! ## Examples
//!
//! ```
//! use innkeep::StayRange;
//!
//! let first = StayRange::parse("2024-06-01", "2024-06-05").unwrap();
//! let second = StayRange::parse("2024-06-05", "2024-06-07").unwrap();
//!
//! // Checkout day and check-in day may coincide
//! assert!(!first.overlaps(&second));
//! assert_eq!(first.nights(), 4);
//! ```

pub mod config;
pub mod database;
pub mod draft;
pub mod error;
pub mod logging;
pub mod mail;
pub mod operations;
pub mod reservation;
pub mod room;
pub mod session;
pub mod stay;
pub mod validation;

// Re-export key types at crate root for convenience
pub use config::{CommitPolicy, Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig, SqliteSessionStore};
pub use draft::{Draft, RoomChoice};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel};
pub use mail::{LogMailer, MailMessage, MailQueue, Mailer, OutboxMailer};
pub use operations::{
    AdminOutcome, AdminReservations, AvailabilityResponse, BookingCommit, BookingFlow,
    ReservationSource, ReservationSummary, SearchOutcome, SubmitOutcome,
};
pub use reservation::{GuestDetails, NewReservation, Reservation};
pub use room::{RestrictionKind, Room, RoomId, RoomRestriction};
pub use session::{DraftSession, MemorySessionStore, SessionStore, SessionToken};
pub use stay::StayRange;
pub use validation::{FormErrors, ReservationForm};
