//! Error types for the innkeep library.
//!
//! This module provides the error hierarchy for availability search, draft
//! handling, and booking commits, using `thiserror` for ergonomic error
//! handling.

use rusqlite::ErrorCode;
use thiserror::Error;

use crate::room::RoomId;

/// Result type alias for operations that may fail with an innkeep error.
///
/// # Examples
///
/// ```
/// use innkeep::{Error, Result};
///
/// fn example_operation() -> Result<i64> {
///     Ok(7)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the innkeep library.
#[derive(Debug, Error)]
pub enum Error {
    /// A date string could not be parsed as `YYYY-MM-DD`.
    #[error("invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        value: String,
    },

    /// A stay range was empty or inverted.
    #[error("invalid stay range {start}..{end}: {reason}")]
    InvalidStayRange {
        /// The requested start date.
        start: String,
        /// The requested end date.
        end: String,
        /// The reason the range is invalid.
        reason: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(rusqlite::Error),

    /// A storage call exceeded its deadline or waited too long for a lock.
    #[error("storage call timed out after {millis}ms")]
    StorageTimeout {
        /// The deadline that was exceeded, in milliseconds.
        millis: u64,
    },

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A session payload could not be encoded.
    #[error("session encoding error: {0}")]
    SessionEncoding(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A step that needs a reservation draft found none in the session.
    #[error("no reservation draft in session")]
    MissingDraft,

    /// The draft is not in a state that allows the requested step.
    #[error("reservation draft is {found}, expected {expected}")]
    DraftState {
        /// The state(s) the step requires.
        expected: &'static str,
        /// The state the draft was actually in.
        found: &'static str,
    },

    /// The room was booked by someone else between search and commit.
    #[error("room {room_id} is no longer available for {start}..{end}")]
    RoomUnavailable {
        /// The contested room.
        room_id: RoomId,
        /// Start of the requested stay.
        start: String,
        /// End of the requested stay.
        end: String,
    },

    /// The reservation row was written but its room restriction was not.
    ///
    /// The reservation is left orphaned and the room still shows as
    /// available for its dates.
    #[error("reservation {reservation_id} saved without its room restriction: {source}")]
    PartialCommit {
        /// Identifier of the orphaned reservation.
        reservation_id: i64,
        /// The error raised by the restriction insert.
        #[source]
        source: Box<Error>,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        // Interrupts come from the per-call deadline, busy from lock waits.
        // The exact limit is not known here; callers that know it use
        // `Error::timeout_with`.
        match err.sqlite_error_code() {
            Some(ErrorCode::OperationInterrupted | ErrorCode::DatabaseBusy) => {
                Self::StorageTimeout { millis: 0 }
            }
            _ => Self::Database(err),
        }
    }
}

impl Error {
    /// Fills in the deadline on a `StorageTimeout`, leaving other errors untouched.
    #[must_use]
    pub fn timeout_with(self, millis: u64) -> Self {
        match self {
            Self::StorageTimeout { .. } => Self::StorageTimeout { millis },
            Self::PartialCommit {
                reservation_id,
                source,
            } => Self::PartialCommit {
                reservation_id,
                source: Box::new(source.timeout_with(millis)),
            },
            other => other,
        }
    }

    /// Check if error is a storage-layer failure (query error or timeout).
    ///
    /// Storage failures must be reported as server faults, never as
    /// "no rooms available".
    ///
    /// # Examples
    ///
    /// ```
    /// use innkeep::Error;
    ///
    /// let err = Error::StorageTimeout { millis: 3000 };
    /// assert!(err.is_storage());
    /// assert!(!Error::MissingDraft.is_storage());
    /// ```
    #[must_use]
    pub fn is_storage(&self) -> bool {
        match self {
            Self::Database(_) | Self::StorageTimeout { .. } => true,
            Self::PartialCommit { source, .. } => source.is_storage(),
            _ => false,
        }
    }

    /// Check if error is caused by user input the caller can retry.
    ///
    /// # Examples
    ///
    /// ```
    /// use innkeep::Error;
    ///
    /// assert!(Error::MissingDraft.is_input());
    /// assert!(!Error::StorageTimeout { millis: 1 }.is_input());
    /// ```
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidDate { .. }
                | Self::InvalidStayRange { .. }
                | Self::MissingDraft
                | Self::DraftState { .. }
                | Self::NotFound { .. }
                | Self::Validation { .. }
        )
    }
}
